//! Materializing a builder at earlier points in its history.
//!
//! The action log is the source of truth, so any prefix of it is a valid
//! builder. Replaying a shorter prefix shows the object as it was then.

use objectfold::ObjectBuilder;
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = ObjectBuilder::new();
    builder
        .set("board.title", "sprint 12")
        .append("board.todo", json!(["write docs", "fix login"]))
        .append("board.todo", "release")
        .remove("board.todo", "fix login")
        .append("board.done", "fix login")
        .copy("board.title", "board.archived_as")
        .set("board.title", "sprint 13");

    let actions = builder.actions();
    for n in 0..=actions.len() {
        let past = ObjectBuilder::from_actions(actions[..n].to_vec());
        println!("after {n} actions: {}", past.value()?);
    }

    // Branch off the todo column only.
    let todo = builder.clone_filtered("board\\.todo")?;
    println!("todo only: {}", todo.value()?);

    Ok(())
}
