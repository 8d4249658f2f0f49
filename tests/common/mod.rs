#![allow(dead_code)]

use objectfold::{Action, ActionKind, FoldError, ObjectBuilder};
use serde_json::{Value, json};

pub fn set_action(key: &str, value: Value) -> Action {
    Action::new(ActionKind::Set, key, [value])
}

/// A builder holding `key1..=keyN` set to `value1..=valueN`.
pub fn keyed_builder(n: usize) -> ObjectBuilder {
    let mut builder = ObjectBuilder::new();
    for i in 1..=n {
        builder.set(&format!("key{i}"), format!("value{i}"));
    }
    builder
}

/// `[{"id": 0}, {"id": 1}, ...]` for the given ids.
pub fn ids(ids: &[i64]) -> Value {
    Value::Array(ids.iter().map(|id| json!({ "id": id })).collect())
}

pub fn value_err(builder: &ObjectBuilder) -> FoldError {
    builder
        .value()
        .expect_err("replay should fail for this log")
}
