mod common;

use common::set_action;
use objectfold::{Action, ActionKind, ActionLog, FoldError, ObjectBuilder, Updater};
use serde_json::{Value, json};

#[test]
fn test_append_returns_position() {
    let mut log = ActionLog::new();
    assert_eq!(log.append(set_action("a", json!(1))), 0);
    assert_eq!(log.append(set_action("b", json!(2))), 1);
    assert_eq!(log.len(), 2);
}

#[test]
fn test_snapshot_is_detached() {
    let mut log = ActionLog::from_actions([set_action("a", json!(1))]);
    let snapshot = log.snapshot();
    log.append(set_action("b", json!(2)));
    log.clear();

    assert_eq!(snapshot.len(), 1);
    assert!(log.is_empty());
}

#[test]
fn test_iteration_preserves_order() {
    let log = ActionLog::from_actions((0..5).map(|i| set_action(&format!("k{i}"), json!(i))));
    let keys: Vec<&str> = log.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["k0", "k1", "k2", "k3", "k4"]);

    let mut count = 0;
    for _ in &log {
        count += 1;
    }
    assert_eq!(count, 5);
}

#[test]
fn test_json_lines_round_trip() {
    let mut builder = ObjectBuilder::new();
    builder
        .set("title", "list")
        .append("items", json!([{"id": 0}]))
        .insert_after("items", json!({"id": {"gte": 0}}), [json!({"id": 1})])
        .copy("title", "heading")
        .delete("title");

    let text = builder.log().to_json_lines().unwrap();
    assert_eq!(text.lines().count(), builder.len());

    let restored = ObjectBuilder::from_log(ActionLog::from_json_lines(&text).unwrap());
    assert_eq!(restored.actions(), builder.actions());
    assert_eq!(restored.value().unwrap(), builder.value().unwrap());
}

#[test]
fn test_json_lines_format() {
    let log = ActionLog::from_actions([Action::new(
        ActionKind::InsertAt,
        "list",
        [json!(0), json!("x")],
    )]);
    assert_eq!(
        log.to_json_lines().unwrap(),
        "{\"type\":\"insertAt\",\"key\":\"list\",\"args\":[0,\"x\"]}\n"
    );
}

#[test]
fn test_from_json_lines_skips_blank_lines() {
    let text = "\n{\"type\":\"set\",\"key\":\"a\",\"args\":[1]}\n   \n{\"type\":\"delete\",\"key\":\"a\"}\n";
    let log = ActionLog::from_json_lines(text).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.as_slice()[1].kind, ActionKind::Delete);
    assert!(log.as_slice()[1].args.is_empty());
}

#[test]
fn test_from_json_lines_rejects_garbage() {
    let err = ActionLog::from_json_lines("{\"type\":\"explode\",\"key\":\"a\"}").unwrap_err();
    assert!(matches!(err, FoldError::Serialization(_)));

    let err = ActionLog::from_json_lines("not json").unwrap_err();
    assert!(matches!(err, FoldError::Serialization(_)));
}

#[test]
fn test_updater_actions_do_not_serialize() {
    let action = Action::new(ActionKind::Update, "a", Vec::<Value>::new())
        .with_arg(Updater::new(|_, _, _| json!(0)));
    let log = ActionLog::from_actions([action]);
    assert!(matches!(
        log.to_json_lines().unwrap_err(),
        FoldError::Serialization(_)
    ));
}
