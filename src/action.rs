use crate::materialize::Projection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// The closed set of mutations an action log can record.
///
/// Serialized in camelCase (`"insertAt"`, `"setAt"`, ...) as the `"type"`
/// field of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Set,
    Delete,
    Append,
    Remove,
    InsertAt,
    SetAt,
    InsertBefore,
    InsertAfter,
    Copy,
    Update,
}

impl ActionKind {
    /// Every action kind, in declaration order.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Set,
        ActionKind::Delete,
        ActionKind::Append,
        ActionKind::Remove,
        ActionKind::InsertAt,
        ActionKind::SetAt,
        ActionKind::InsertBefore,
        ActionKind::InsertAfter,
        ActionKind::Copy,
        ActionKind::Update,
    ];

    /// The camelCase name used in serialized logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Set => "set",
            ActionKind::Delete => "delete",
            ActionKind::Append => "append",
            ActionKind::Remove => "remove",
            ActionKind::InsertAt => "insertAt",
            ActionKind::SetAt => "setAt",
            ActionKind::InsertBefore => "insertBefore",
            ActionKind::InsertAfter => "insertAfter",
            ActionKind::Copy => "copy",
            ActionKind::Update => "update",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature of an update callable: `(current, matched_key, projection) -> new`.
///
/// `current` is `None` when an exact update targets a key that is not
/// present yet.
pub type UpdateFn = dyn Fn(Option<&Value>, &str, &Projection) -> Value + Send + Sync;

/// A shared callable used as the replacement of an [`ActionKind::Update`].
///
/// Cloning an `Updater` (or a log containing one) shares the same closure.
/// Two updaters compare equal only if they point at the same closure.
#[derive(Clone)]
pub struct Updater(Arc<UpdateFn>);

impl Updater {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &str, &Projection) -> Value + Send + Sync + 'static,
    {
        Updater(Arc::new(f))
    }

    /// Invoke the closure.
    pub fn call(&self, current: Option<&Value>, key: &str, projection: &Projection) -> Value {
        (self.0)(current, key, projection)
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Updater(<fn>)")
    }
}

impl PartialEq for Updater {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One positional argument of an [`Action`].
///
/// Serialized untagged: a `Value` argument is written as plain JSON. An
/// `Updater` cannot be serialized; attempting to do so is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    /// A JSON value.
    Value(Value),
    /// A callable replacement, only meaningful for updates.
    #[serde(skip)]
    Updater(Updater),
}

impl Arg {
    /// Returns the JSON value, or `None` for an updater.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Updater(_) => None,
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Updater> for Arg {
    fn from(updater: Updater) -> Self {
        Arg::Updater(updater)
    }
}

/// An immutable mutation command recorded in an action log.
///
/// `key` is a dot-delimited path (`"a.b.c"`). It is kept as an opaque string
/// while the log is replayed and only split into levels when the flat
/// projection is expanded into a nested object.
///
/// # Examples
///
/// ```
/// use objectfold::{Action, ActionKind};
/// use serde_json::json;
///
/// let action = Action::new(ActionKind::Append, "tags", [json!("rust"), json!("json")]);
/// assert_eq!(action.kind, ActionKind::Append);
/// assert_eq!(action.args.len(), 2);
///
/// let line = serde_json::to_string(&action).unwrap();
/// assert_eq!(line, r#"{"type":"append","key":"tags","args":["rust","json"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Which handler replays this action.
    ///
    /// Serialized as `"type"`.
    #[serde(rename = "type")]
    pub kind: ActionKind,

    /// Dot-delimited target path.
    pub key: String,

    /// Every positional value supplied when the action was recorded.
    #[serde(default)]
    pub args: Vec<Arg>,
}

impl Action {
    /// Create an action from JSON-convertible arguments.
    pub fn new<I, V>(kind: ActionKind, key: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Action {
            kind,
            key: key.into(),
            args: args.into_iter().map(|v| Arg::Value(v.into())).collect(),
        }
    }

    /// Append one more argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::{Action, ActionKind, Arg};
    /// use serde_json::json;
    ///
    /// let action = Action::new(ActionKind::Set, "a", Vec::<serde_json::Value>::new())
    ///     .with_arg(json!(1));
    /// assert_eq!(action.args, vec![Arg::Value(json!(1))]);
    /// ```
    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Returns `true` if any argument is an [`Updater`].
    pub fn has_updater(&self) -> bool {
        self.args.iter().any(|a| matches!(a, Arg::Updater(_)))
    }
}

/// Options for [`ObjectBuilder::copy_with`](crate::ObjectBuilder::copy_with).
///
/// Recorded in the log as `{"overwrite": bool, "deleteSource": bool}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Replace the destination if it already exists.
    pub overwrite: bool,
    /// Remove the source after copying (move semantics).
    pub delete_source: bool,
}

impl CopyOptions {
    /// Allow overwriting an existing destination.
    pub fn with_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Delete the source key once copied.
    pub fn with_delete_source(mut self) -> Self {
        self.delete_source = true;
        self
    }

    pub(crate) fn to_value(self) -> Value {
        json!({ "overwrite": self.overwrite, "deleteSource": self.delete_source })
    }
}

/// Options for [`ObjectBuilder::update_with`](crate::ObjectBuilder::update_with).
///
/// The key is matched literally only when `exact` is set and `fuzzy` is not;
/// otherwise it is a regular expression tested against every projection key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    pub fuzzy: bool,
    pub exact: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        UpdateOptions {
            fuzzy: true,
            exact: false,
        }
    }
}

impl UpdateOptions {
    /// Match the key literally.
    pub fn exact() -> Self {
        UpdateOptions {
            fuzzy: false,
            exact: true,
        }
    }

    pub(crate) fn to_value(self) -> Value {
        json!({ "fuzzy": self.fuzzy, "exact": self.exact })
    }
}

/// The new value of an update: a literal or a callable.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Value(Value),
    Updater(Updater),
}

impl Replacement {
    /// A literal replacement.
    pub fn value(value: impl Into<Value>) -> Self {
        Replacement::Value(value.into())
    }

    /// A callable replacement.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>, &str, &Projection) -> Value + Send + Sync + 'static,
    {
        Replacement::Updater(Updater::new(f))
    }
}

impl From<Replacement> for Arg {
    fn from(replacement: Replacement) -> Self {
        match replacement {
            Replacement::Value(v) => Arg::Value(v),
            Replacement::Updater(u) => Arg::Updater(u),
        }
    }
}
