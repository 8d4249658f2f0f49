//! Structural predicates used to locate array elements.
//!
//! A match spec is a JSON object whose fields are compared against the same
//! fields of a candidate item:
//!
//! ```text
//! { "id": 2 }                     item.id strictly equals 2
//! { "id": { "gte": 1 } }          item.id >= 1 after numeric cast
//! { "tag": { "in": ["a", "b"] } } item.tag is one of the listed values
//! ```
//!
//! Comparisons follow JavaScript semantics (numeric cast, loose equality),
//! so logs recorded by other tooling replay identically.

use crate::error::{FoldError, FoldResult};
use crate::path::array_index;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;

/// A comparison operator in a match spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
    Is,
    Not,
    In,
    Nin,
}

impl Operator {
    /// Parse an operator name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let op = match name {
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "eq" => Operator::Eq,
            "neq" => Operator::Neq,
            "is" => Operator::Is,
            "not" => Operator::Not,
            "in" => Operator::In,
            "nin" => Operator::Nin,
            _ => return None,
        };
        Some(op)
    }

    fn name(&self) -> &'static str {
        match self {
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Is => "is",
            Operator::Not => "not",
            Operator::In => "in",
            Operator::Nin => "nin",
        }
    }

    fn evaluate(&self, actual: Option<&Value>, comparand: &Value) -> FoldResult<bool> {
        let result = match self {
            Operator::Gt => to_number(actual) > to_number(Some(comparand)),
            Operator::Gte => to_number(actual) >= to_number(Some(comparand)),
            Operator::Lt => to_number(actual) < to_number(Some(comparand)),
            Operator::Lte => to_number(actual) <= to_number(Some(comparand)),
            Operator::Eq | Operator::Is => loose_eq(actual, comparand),
            Operator::Neq | Operator::Not => !loose_eq(actual, comparand),
            Operator::In | Operator::Nin => {
                let Some(members) = comparand.as_array() else {
                    return Err(FoldError::InvalidOperand {
                        operator: self.name().to_string(),
                    });
                };
                let found = actual.is_some_and(|a| members.iter().any(|m| strict_eq(a, m)));
                found == (*self == Operator::In)
            }
        };
        Ok(result)
    }
}

/// Returns `true` if `item` satisfies every field of `spec`.
///
/// Fields missing from `item` read as undefined: they never strictly equal
/// a literal and cast to NaN for ordering comparisons. When `item` is an
/// array, canonical index fields (`"0"`, `"1"`, ...) read its elements.
///
/// An expected value that is an object holds a single operator; an array
/// is read the same way, so its first index is taken as the operator name
/// and is rejected.
///
/// # Errors
///
/// [`FoldError::UnknownOperator`] if an operator object names no known
/// operator, [`FoldError::InvalidOperand`] if `in`/`nin` is given a
/// non-array comparand.
///
/// # Examples
///
/// ```
/// use objectfold::matches;
/// use serde_json::json;
///
/// let spec = json!({"id": {"gte": 1}, "valid": true});
/// let spec = spec.as_object().unwrap();
/// assert!(matches(&json!({"id": 2, "valid": true}), spec).unwrap());
/// assert!(!matches(&json!({"id": 0, "valid": true}), spec).unwrap());
/// ```
pub fn matches(item: &Value, spec: &Map<String, Value>) -> FoldResult<bool> {
    for (field, expected) in spec {
        let actual = field_of(item, field);
        let ok = match expected {
            Value::Object(ops) => {
                let Some((name, comparand)) = ops.iter().next() else {
                    return Err(FoldError::UnknownOperator {
                        operator: String::new(),
                    });
                };
                let op = Operator::parse(name).ok_or_else(|| FoldError::UnknownOperator {
                    operator: name.clone(),
                })?;
                op.evaluate(actual, comparand)?
            }
            Value::Array(items) => {
                return Err(FoldError::UnknownOperator {
                    operator: if items.is_empty() { String::new() } else { "0".to_string() },
                });
            }
            literal => actual.is_some_and(|a| strict_eq(a, literal)),
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Index of the first element of `items` matching `locator`.
///
/// Object and array locators are match specs (an array's fields are its
/// indices); any other locator is compared with strict equality.
///
/// # Errors
///
/// Same as [`matches`].
pub(crate) fn locate(items: &[Value], locator: &Value) -> FoldResult<Option<usize>> {
    let spec = match locator {
        Value::Object(spec) => Cow::Borrowed(spec),
        Value::Array(fields) => Cow::Owned(
            fields
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.clone()))
                .collect(),
        ),
        literal => return Ok(items.iter().position(|item| strict_eq(item, literal))),
    };
    for (i, item) in items.iter().enumerate() {
        if matches(item, &spec)? {
            return Ok(Some(i));
        }
    }
    Ok(None)
}

fn field_of<'a>(item: &'a Value, field: &str) -> Option<&'a Value> {
    match item {
        Value::Object(obj) => obj.get(field),
        Value::Array(items) => array_index(field).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Strict equality over JSON values.
///
/// Numbers compare by value (`1 == 1.0`); everything else compares
/// structurally.
pub(crate) fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| strict_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| strict_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Loose equality: `null` equals undefined, booleans and numeric strings
/// coerce to numbers when compared against numbers.
///
/// An array or object compared with a scalar is first turned into its
/// string form (arrays join their elements with `,`). Two composites
/// compare structurally with [`strict_eq`].
pub(crate) fn loose_eq(actual: Option<&Value>, expected: &Value) -> bool {
    let Some(actual) = actual else {
        return expected.is_null();
    };
    if actual.is_null() || expected.is_null() {
        return actual.is_null() && expected.is_null();
    }
    if is_composite(actual) && is_composite(expected) {
        return strict_eq(actual, expected);
    }
    match (primitive(actual).as_ref(), primitive(expected).as_ref()) {
        (Value::String(a), Value::String(b)) => a == b,
        (a, b) => to_number(Some(a)) == to_number(Some(b)),
    }
}

/// Numeric cast with JavaScript's unary `+` rules.
///
/// Undefined becomes NaN, `null` becomes 0, booleans become 0/1, strings
/// are parsed after trimming (empty is 0). Arrays and objects are cast
/// through their string form.
pub(crate) fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_number(s),
        Some(composite) => parse_number(&to_js_string(composite)),
    }
}

/// Format a number the way JavaScript's `String(n)` does for the values
/// JSON can hold: integral floats lose their fractional part.
///
/// # Examples
///
/// ```text
/// 1      -> "1"
/// 1.0    -> "1"
/// -0.0   -> "0"
/// 2.5    -> "2.5"
/// ```
pub(crate) fn number_to_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// The string JavaScript produces when `value` is used where a string is
/// expected.
fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn is_composite(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

fn primitive(value: &Value) -> Cow<'_, Value> {
    if is_composite(value) {
        Cow::Owned(Value::String(to_js_string(value)))
    } else {
        Cow::Borrowed(value)
    }
}

/// JavaScript truthiness.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |n| n as f64);
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}
