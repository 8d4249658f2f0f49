//! Dotted-path addressing over nested JSON values.
//!
//! A path like `"a.b.0"` walks object keys, and numeric segments index into
//! arrays that already exist at that level.

use serde_json::{Map, Value};

/// Highest index an array is padded with nulls to reach.
///
/// A segment past it turns the array into an object keyed by index.
pub const MAX_PADDED_INDEX: usize = u16::MAX as usize;

/// Parse a canonical array index (`"0"`, `"17"`, not `"01"` or `"+1"`).
pub(crate) fn array_index(seg: &str) -> Option<usize> {
    let idx = seg.parse::<usize>().ok()?;
    (idx.to_string() == seg).then_some(idx)
}

/// Read the value at `path`.
///
/// Returns `None` if any segment is missing.
///
/// # Examples
///
/// ```
/// use objectfold::path;
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": [10, 20]}});
/// assert_eq!(path::get(&doc, "a.b.1"), Some(&json!(20)));
/// assert_eq!(path::get(&doc, "a.c"), None);
/// ```
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, seg| match current {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => array_index(seg).and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// A non-container met along the way is replaced by an empty object. An
/// array index past the end pads the array with nulls, up to
/// [`MAX_PADDED_INDEX`]; beyond that the array becomes an object whose keys
/// are the element indices.
///
/// # Examples
///
/// ```
/// use objectfold::path;
/// use serde_json::json;
///
/// let mut doc = json!({});
/// path::set(&mut doc, "a.b", json!(1));
/// path::set(&mut doc, "a.c", json!(2));
/// assert_eq!(doc, json!({"a": {"b": 1, "c": 2}}));
/// ```
pub fn set(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    set_at(root, &segments, value);
}

fn set_at(current: &mut Value, segments: &[&str], value: Value) {
    let [seg, rest @ ..] = segments else {
        *current = value;
        return;
    };

    if let Value::Array(items) = current {
        if let Some(idx) = array_index(seg) {
            if idx <= MAX_PADDED_INDEX {
                if idx >= items.len() {
                    items.resize(idx + 1, Value::Null);
                }
                set_at(&mut items[idx], rest, value);
                return;
            }
            let keyed: Map<String, Value> = std::mem::take(items)
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect();
            *current = Value::Object(keyed);
        }
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        let entry = map.entry(seg.to_string()).or_insert(Value::Null);
        set_at(entry, rest, value);
    }
}
