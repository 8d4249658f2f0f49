//! Turning an action log into a nested object.
//!
//! Materialization runs in three separate passes:
//!
//! 1. [`replay`] folds the actions, in order, over an empty flat
//!    [`Projection`] keyed by dotted path.
//! 2. [`expand`] splits every key on `.` and builds the nested tree.
//! 3. [`prune`] drops nulls and objects left empty.

use crate::action::Action;
use crate::error::FoldResult;
use crate::handlers;
use crate::path;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Flat, insertion-ordered map from dotted path to value.
///
/// Exists only for the duration of one materialization.
pub type Projection = IndexMap<String, Value>;

/// Replay `actions` over an empty projection.
///
/// Stops at the first failing action. The partially built projection is
/// dropped; nothing of it is returned.
///
/// # Errors
///
/// Returns the error of the first action whose handler fails.
pub fn replay<'a>(actions: impl IntoIterator<Item = &'a Action>) -> FoldResult<Projection> {
    let mut projection = Projection::new();
    let mut applied = 0usize;
    for action in actions {
        log::trace!("objectfold: applying {} {:?}", action.kind, action.key);
        handlers::apply(&mut projection, action)?;
        applied += 1;
    }
    log::debug!(
        "objectfold: replayed {applied} actions into {} keys",
        projection.len()
    );
    Ok(projection)
}

/// Expand a flat projection into a nested object.
///
/// Keys are written in projection order, so a later shallow key replaces
/// whatever an earlier deeper key created beneath it, and vice versa.
pub fn expand(projection: Projection) -> Value {
    let mut root = Value::Object(Map::new());
    for (key, value) in projection {
        path::set(&mut root, &key, value);
    }
    root
}

/// Remove null values and empty objects, recursively.
///
/// Arrays are kept as they are, even when empty, and are not descended
/// into. Non-object input is returned unchanged.
///
/// # Examples
///
/// ```
/// use objectfold::materialize::prune;
/// use serde_json::json;
///
/// let pruned = prune(json!({"a": null, "b": {"c": {}}, "d": [], "e": {"f": 1}}));
/// assert_eq!(pruned, json!({"d": [], "e": {"f": 1}}));
/// ```
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_map(map)),
        other => other,
    }
}

fn prune_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Object(child) => {
                let child = prune_map(child);
                (!child.is_empty()).then(|| (key, Value::Object(child)))
            }
            other => Some((key, other)),
        })
        .collect()
}

/// Replay, expand and prune in one call.
///
/// # Errors
///
/// Returns the error of the first action whose handler fails.
///
/// # Examples
///
/// ```
/// use objectfold::{Action, ActionKind, materialize};
/// use serde_json::json;
///
/// let actions = vec![
///     Action::new(ActionKind::Set, "user.name", [json!("alice")]),
///     Action::new(ActionKind::Append, "user.tags", [json!("admin")]),
/// ];
/// let value = materialize::materialize(&actions).unwrap();
/// assert_eq!(value, json!({"user": {"name": "alice", "tags": ["admin"]}}));
/// ```
pub fn materialize<'a>(actions: impl IntoIterator<Item = &'a Action>) -> FoldResult<Value> {
    let projection = replay(actions)?;
    Ok(prune(expand(projection)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use serde_json::json;

    #[test]
    fn test_replay_stops_at_first_failure() {
        let actions = vec![
            Action::new(ActionKind::Set, "a", [json!(1)]),
            Action::new(ActionKind::Remove, "missing", [json!(1)]),
            Action::new(ActionKind::Set, "b", [json!(2)]),
        ];
        assert!(replay(&actions).is_err());
    }

    #[test]
    fn test_expand_keeps_projection_order() {
        let mut projection = Projection::new();
        projection.insert("a".to_string(), json!({"x": 1}));
        projection.insert("a.y".to_string(), json!(2));
        assert_eq!(expand(projection), json!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn test_prune_drops_objects_emptied_by_pruning() {
        assert_eq!(prune(json!({"a": {"b": null}})), json!({}));
    }
}
