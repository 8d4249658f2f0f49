//! Per-action replay semantics.
//!
//! Every handler mutates the flat projection for exactly one action. Keys
//! are opaque strings here; nothing is split on `.` until expansion.

use crate::action::{Action, ActionKind, Arg};
use crate::error::{FoldError, FoldResult, value_type_name};
use crate::materialize::Projection;
use crate::matcher::{self, number_to_string, strict_eq, truthy};
use regex::Regex;
use serde_json::{Map, Value};

/// Apply one action to the projection.
///
/// # Errors
///
/// Returns the handler's error. The projection may have been partially
/// modified and should be discarded.
pub(crate) fn apply(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    match action.kind {
        ActionKind::Set => set(projection, action),
        ActionKind::Delete => delete(projection, action),
        ActionKind::Append => append(projection, action),
        ActionKind::Remove => remove(projection, action),
        ActionKind::InsertAt => splice_at(projection, action, false),
        ActionKind::SetAt => splice_at(projection, action, true),
        ActionKind::InsertBefore => insert_near(projection, action, false),
        ActionKind::InsertAfter => insert_near(projection, action, true),
        ActionKind::Copy => copy(projection, action),
        ActionKind::Update => update(projection, action),
    }
}

fn set(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    let Some(first) = action.args.first() else {
        return Err(empty_value(action));
    };
    let value = json_arg(action, first)?.clone();
    projection.insert(action.key.clone(), value);
    Ok(())
}

fn delete(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    require_key(action)?;
    let mut keys = vec![action.key.clone()];
    for arg in &action.args {
        keys.push(key_arg(action, arg)?);
    }
    for key in &keys {
        projection.shift_remove(key);
    }
    Ok(())
}

fn append(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    require_key(action)?;
    if let Some(existing) = projection.get(&action.key) {
        if !existing.is_array() {
            return Err(not_an_array(action, existing));
        }
    }
    let values = json_args(action, &action.args)?;
    if values.is_empty() {
        return Err(empty_value(action));
    }

    let items = match values.as_slice() {
        [Value::Array(inner)] => inner.clone(),
        _ => values,
    };
    let entry = projection
        .entry(action.key.clone())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(array) = entry {
        array.extend(items);
    }
    Ok(())
}

fn remove(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    let array = existing_array(projection, action)?;
    let values = json_args(action, &action.args)?;
    if values.is_empty() {
        return Err(empty_value(action));
    }

    let doomed = match values.as_slice() {
        [Value::Array(inner)] => inner.clone(),
        _ => values,
    };
    array.retain(|item| !doomed.iter().any(|d| strict_eq(item, d)));
    Ok(())
}

/// InsertAt and SetAt: splice `args[1..]` at the index in `args[0]`.
///
/// With `overwrite`, as many existing elements as there are new items are
/// replaced, starting at the index.
fn splice_at(projection: &mut Projection, action: &Action, overwrite: bool) -> FoldResult<()> {
    let array = existing_array(projection, action)?;
    let index = match action.args.first().and_then(Arg::as_value) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        _ => {
            return Err(FoldError::IndexNotNumber {
                action: action.kind,
                key: action.key.clone(),
            });
        }
    };
    if index < 0.0 {
        return Err(FoldError::NegativeIndex {
            action: action.kind,
            key: action.key.clone(),
            index,
        });
    }

    let items = json_args(action, &action.args[1..])?;
    let start = (index as usize).min(array.len());
    let end = if overwrite {
        (start + items.len()).min(array.len())
    } else {
        start
    };
    array.splice(start..end, items);
    Ok(())
}

/// InsertBefore and InsertAfter: splice `args[1..]` next to the first
/// element matching `args[0]`.
fn insert_near(projection: &mut Projection, action: &Action, after: bool) -> FoldResult<()> {
    let array = existing_array(projection, action)?;
    if action.args.len() < 2 {
        return Err(FoldError::InsufficientArguments {
            action: action.kind,
            key: action.key.clone(),
            expected: 2,
            found: action.args.len(),
        });
    }

    let locator = json_arg(action, &action.args[0])?;
    let Some(position) = matcher::locate(array, locator)? else {
        return Err(FoldError::ItemNotFound {
            action: action.kind,
            key: action.key.clone(),
        });
    };

    let items = json_args(action, &action.args[1..])?;
    let at = if after { position + 1 } else { position };
    array.splice(at..at, items);
    Ok(())
}

fn copy(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    require_key(action)?;
    let Some(source) = projection.get(&action.key) else {
        return Err(FoldError::SourceMissing {
            key: action.key.clone(),
        });
    };
    let Some(dest_arg) = action.args.first() else {
        return Err(FoldError::InsufficientArguments {
            action: action.kind,
            key: action.key.clone(),
            expected: 1,
            found: 0,
        });
    };
    let destination = key_arg(action, dest_arg)?;
    let options = options_arg(action.args.get(1));
    let overwrite = option_flag(options, "overwrite", false);
    let delete_source = option_flag(options, "deleteSource", false);

    if !overwrite && projection.contains_key(&destination) {
        return Err(FoldError::DestinationExists {
            key: action.key.clone(),
            destination,
        });
    }

    let value = source.clone();
    projection.insert(destination, value);
    if delete_source {
        projection.shift_remove(&action.key);
    }
    Ok(())
}

fn update(projection: &mut Projection, action: &Action) -> FoldResult<()> {
    require_key(action)?;
    let Some(replacement) = action.args.first() else {
        return Err(empty_value(action));
    };
    let options = options_arg(action.args.get(1));
    let fuzzy = option_flag(options, "fuzzy", true);
    let exact = option_flag(options, "exact", false);

    let keys: Vec<String> = if !exact || fuzzy {
        let pattern = Regex::new(&action.key)
            .map_err(|e| FoldError::invalid_pattern(action.key.as_str(), e))?;
        projection
            .keys()
            .filter(|k| pattern.is_match(k))
            .cloned()
            .collect()
    } else {
        vec![action.key.clone()]
    };
    if keys.is_empty() {
        log::warn!(
            "objectfold: update pattern {:?} matched no keys",
            action.key
        );
    }

    for key in keys {
        let value = match replacement {
            Arg::Value(v) => v.clone(),
            Arg::Updater(f) => f.call(projection.get(&key), &key, projection),
        };
        projection.insert(key, value);
    }
    Ok(())
}

fn require_key(action: &Action) -> FoldResult<()> {
    if action.key.is_empty() {
        return Err(FoldError::MissingKey {
            action: action.kind,
        });
    }
    Ok(())
}

/// The array at the action key, or the matching error.
fn existing_array<'p>(
    projection: &'p mut Projection,
    action: &Action,
) -> FoldResult<&'p mut Vec<Value>> {
    require_key(action)?;
    match projection.get_mut(&action.key) {
        None => Err(FoldError::ArrayMissing {
            action: action.kind,
            key: action.key.clone(),
        }),
        Some(Value::Array(array)) => Ok(array),
        Some(other) => Err(not_an_array(action, other)),
    }
}

fn json_arg<'a>(action: &Action, arg: &'a Arg) -> FoldResult<&'a Value> {
    arg.as_value().ok_or_else(|| FoldError::UnexpectedUpdater {
        action: action.kind,
        key: action.key.clone(),
    })
}

fn json_args(action: &Action, args: &[Arg]) -> FoldResult<Vec<Value>> {
    args.iter()
        .map(|arg| json_arg(action, arg).cloned())
        .collect()
}

/// A key given as an argument: strings as-is, numbers as JavaScript
/// formats them (`1.0` is the key `"1"`).
fn key_arg(action: &Action, arg: &Arg) -> FoldResult<String> {
    match json_arg(action, arg)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(number_to_string(n)),
        other => Err(FoldError::InvalidKeyType {
            action: action.kind,
            key: action.key.clone(),
            found: value_type_name(other),
        }),
    }
}

fn options_arg(arg: Option<&Arg>) -> Option<&Map<String, Value>> {
    arg.and_then(Arg::as_value).and_then(Value::as_object)
}

fn option_flag(options: Option<&Map<String, Value>>, name: &str, default: bool) -> bool {
    match options.and_then(|o| o.get(name)) {
        Some(v) => truthy(v),
        None => default,
    }
}

fn empty_value(action: &Action) -> FoldError {
    FoldError::EmptyValue {
        action: action.kind,
        key: action.key.clone(),
    }
}

fn not_an_array(action: &Action, found: &Value) -> FoldError {
    FoldError::NotAnArray {
        action: action.kind,
        key: action.key.clone(),
        found: value_type_name(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_arg_formats_numbers() {
        let action = Action::new(ActionKind::Delete, "a", [json!(3)]);
        assert_eq!(key_arg(&action, &action.args[0]).unwrap(), "3");

        let action = Action::new(ActionKind::Delete, "a", [json!(3.0)]);
        assert_eq!(key_arg(&action, &action.args[0]).unwrap(), "3");
    }
}
