use objectfold::{Action, ActionKind, ActionLog, CloneFilter, ObjectBuilder};
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("a.x".to_string()),
        Just("b.y.z".to_string()),
        Just("list".to_string()),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

// Actions that never fail to replay: set, delete and append on keys that
// only ever hold arrays when appended to.
fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_key(), arb_scalar()).prop_filter_map("list only takes appends", |(k, v)| {
            (k != "list").then(|| Action::new(ActionKind::Set, k, [v]))
        }),
        arb_key().prop_map(|k| Action::new(ActionKind::Delete, k, Vec::<Value>::new())),
        arb_scalar().prop_map(|v| Action::new(ActionKind::Append, "list", [v])),
    ]
}

fn arb_actions() -> impl Strategy<Value = Vec<Action>> {
    proptest::collection::vec(arb_action(), 0..40)
}

// Materializing the same log twice yields the same object.
proptest! {
    #[test]
    fn prop_value_is_deterministic(actions in arb_actions()) {
        let builder = ObjectBuilder::from_actions(actions);
        let first = builder.value().unwrap();
        let second = builder.value().unwrap();
        prop_assert_eq!(first, second);
    }
}

// A builder and an unfiltered clone of it materialize to the same object.
proptest! {
    #[test]
    fn prop_unfiltered_clone_matches(actions in arb_actions()) {
        let builder = ObjectBuilder::from_actions(actions);
        let cloned = builder.clone_filtered(CloneFilter::All).unwrap();
        prop_assert_eq!(cloned.actions(), builder.actions());
        prop_assert_eq!(cloned.value().unwrap(), builder.value().unwrap());
    }
}

// Recording into the original after cloning never changes the clone.
proptest! {
    #[test]
    fn prop_clone_is_independent(
        actions in arb_actions(),
        extra in arb_actions(),
    ) {
        let mut builder = ObjectBuilder::from_actions(actions);
        let cloned = builder.clone_filtered(CloneFilter::All).unwrap();
        let before = cloned.value().unwrap();

        builder.extend(extra);
        prop_assert_eq!(cloned.value().unwrap(), before);
    }
}

// Deleting a key as the last action leaves nothing at that exact path.
proptest! {
    #[test]
    fn prop_set_then_delete_leaves_key_absent(
        actions in arb_actions(),
        value in arb_scalar(),
    ) {
        let mut builder = ObjectBuilder::from_actions(actions);
        builder.set("fresh.key", value).delete("fresh.key");
        prop_assert_eq!(builder.value_at("fresh.key").unwrap(), None);
    }
}

// The JSON-lines encoding of a log restores an equivalent builder.
proptest! {
    #[test]
    fn prop_json_lines_preserve_value(actions in arb_actions()) {
        let builder = ObjectBuilder::from_actions(actions);
        let text = builder.log().to_json_lines().unwrap();
        let restored = ObjectBuilder::from_log(ActionLog::from_json_lines(&text).unwrap());
        prop_assert_eq!(restored.value().unwrap(), builder.value().unwrap());
    }
}
