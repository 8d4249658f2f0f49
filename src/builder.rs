use crate::action::{Action, ActionKind, Arg, CopyOptions, Replacement, UpdateOptions, Updater};
use crate::error::{FoldError, FoldResult, value_type_name};
use crate::filter::CloneFilter;
use crate::log::ActionLog;
use crate::materialize::{self, Projection};
use crate::path;
use serde::Serialize;
use serde_json::{Map, Value};

/// A fluent builder that records mutations and derives an object from them.
///
/// Recording methods only append to the builder's [`ActionLog`]; nothing is
/// validated or computed until [`value`](ObjectBuilder::value) replays the
/// log. Every recording method returns `&mut Self` so calls chain.
///
/// Cloning (via [`Clone`] or [`clone_filtered`](ObjectBuilder::clone_filtered))
/// gives the new builder its own log.
///
/// # Examples
///
/// ```
/// use objectfold::ObjectBuilder;
/// use serde_json::json;
///
/// let mut builder = ObjectBuilder::new();
/// builder
///     .set("user.name", "alice")
///     .append("user.roles", json!(["admin", "dev"]))
///     .remove("user.roles", "dev");
///
/// assert_eq!(
///     builder.value().unwrap(),
///     json!({"user": {"name": "alice", "roles": ["admin"]}})
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    log: ActionLog,
}

impl ObjectBuilder {
    /// Create a builder with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded with `actions`.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        ObjectBuilder {
            log: ActionLog::from_actions(actions),
        }
    }

    /// Create a builder that takes over an existing log.
    pub fn from_log(log: ActionLog) -> Self {
        ObjectBuilder { log }
    }

    /// Record a raw action.
    pub fn record(&mut self, action: Action) -> &mut Self {
        self.log.append(action);
        self
    }

    /// Record several raw actions in order.
    pub fn extend(&mut self, actions: impl IntoIterator<Item = Action>) -> &mut Self {
        self.log.extend(actions);
        self
    }

    fn push<I, V>(&mut self, kind: ActionKind, key: &str, args: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.record(Action::new(kind, key, args))
    }

    /// Set `key` to `value`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.push(ActionKind::Set, key, [value.into()])
    }

    /// Delete `key`.
    pub fn delete(&mut self, key: &str) -> &mut Self {
        self.push(ActionKind::Delete, key, Vec::<Value>::new())
    }

    /// Delete `key` and every key in `others`.
    pub fn delete_many<I, K>(&mut self, key: &str, others: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Value>,
    {
        self.push(ActionKind::Delete, key, others)
    }

    /// Append to the array at `key`, creating it if absent.
    ///
    /// An array argument is concatenated element by element.
    pub fn append(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.push(ActionKind::Append, key, [value.into()])
    }

    /// Append every value, in order, to the array at `key`.
    pub fn append_many<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::Append, key, values)
    }

    /// Remove every occurrence of `item` from the array at `key`.
    ///
    /// An array argument removes each of its elements.
    pub fn remove(&mut self, key: &str, item: impl Into<Value>) -> &mut Self {
        self.push(ActionKind::Remove, key, [item.into()])
    }

    /// Remove every occurrence of each item from the array at `key`.
    pub fn remove_many<I, V>(&mut self, key: &str, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::Remove, key, items)
    }

    /// Insert `items` into the array at `key`, starting at `index`.
    pub fn insert_at<I, V>(&mut self, key: &str, index: i64, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::InsertAt, key, positional(Value::from(index), items))
    }

    /// Overwrite the array at `key` with `items`, starting at `index`.
    ///
    /// Items past the current end are appended.
    pub fn set_at<I, V>(&mut self, key: &str, index: i64, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::SetAt, key, positional(Value::from(index), items))
    }

    /// Insert `items` before the first element matching `locator`.
    ///
    /// An object locator is a match spec (see [`matches`](crate::matches));
    /// anything else is compared for equality.
    pub fn insert_before<I, V>(
        &mut self,
        key: &str,
        locator: impl Into<Value>,
        items: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::InsertBefore, key, positional(locator.into(), items))
    }

    /// Insert `items` after the first element matching `locator`.
    pub fn insert_after<I, V>(
        &mut self,
        key: &str,
        locator: impl Into<Value>,
        items: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push(ActionKind::InsertAfter, key, positional(locator.into(), items))
    }

    /// Copy the value at `source` to `destination`.
    ///
    /// Fails at replay time if `destination` already exists.
    pub fn copy(&mut self, source: &str, destination: &str) -> &mut Self {
        self.push(ActionKind::Copy, source, [destination])
    }

    /// Copy (or move) with explicit options.
    pub fn copy_with(
        &mut self,
        source: &str,
        destination: &str,
        options: CopyOptions,
    ) -> &mut Self {
        self.push(
            ActionKind::Copy,
            source,
            [Value::from(destination), options.to_value()],
        )
    }

    /// Set every key matching the regular expression `pattern` to `value`.
    pub fn update(&mut self, pattern: &str, value: impl Into<Value>) -> &mut Self {
        self.push(ActionKind::Update, pattern, [value.into()])
    }

    /// Replace the value of every key matching `pattern` with `f(current, key, projection)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::ObjectBuilder;
    /// use serde_json::{json, Value};
    ///
    /// let mut builder = ObjectBuilder::new();
    /// builder
    ///     .set("hits.home", 1)
    ///     .set("hits.about", 4)
    ///     .update_fn("^hits\\.", |current, _key, _projection| {
    ///         let n = current.and_then(Value::as_i64).unwrap_or(0);
    ///         json!(n * 10)
    ///     });
    /// assert_eq!(builder.value().unwrap(), json!({"hits": {"home": 10, "about": 40}}));
    /// ```
    pub fn update_fn<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(Option<&Value>, &str, &Projection) -> Value + Send + Sync + 'static,
    {
        let action =
            Action::new(ActionKind::Update, pattern, Vec::<Value>::new()).with_arg(Updater::new(f));
        self.record(action)
    }

    /// Update with an explicit replacement and options.
    pub fn update_with(
        &mut self,
        key: &str,
        replacement: Replacement,
        options: UpdateOptions,
    ) -> &mut Self {
        let action = Action::new(ActionKind::Update, key, Vec::<Value>::new())
            .with_arg(Arg::from(replacement))
            .with_arg(options.to_value());
        self.record(action)
    }

    /// Flatten a nested object into `set` actions and append them.
    ///
    /// Every leaf path is joined with `.`; arrays and scalars are leaves,
    /// nested objects are descended into. Existing actions are kept.
    ///
    /// # Errors
    ///
    /// Fails with [`FoldError::NotAnObject`] if `obj` does not serialize to
    /// a JSON object, or [`FoldError::Serialization`] if it cannot be
    /// serialized at all. Nothing is recorded on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::ObjectBuilder;
    /// use serde_json::json;
    ///
    /// let mut builder = ObjectBuilder::new();
    /// builder.init(&json!({"x": 1, "y": {"z": 2}})).unwrap();
    /// assert_eq!(builder.len(), 2);
    /// assert_eq!(builder.value().unwrap(), json!({"x": 1, "y": {"z": 2}}));
    /// ```
    pub fn init<T: Serialize + ?Sized>(&mut self, obj: &T) -> FoldResult<&mut Self> {
        let map = match serde_json::to_value(obj)? {
            Value::Object(map) => map,
            other => {
                return Err(FoldError::NotAnObject {
                    found: value_type_name(&other),
                });
            }
        };
        let mut actions = Vec::new();
        flatten_into(&mut actions, None, map);
        self.log.extend(actions);
        Ok(self)
    }

    /// Drop every recorded action.
    pub fn clear(&mut self) -> &mut Self {
        self.log.clear();
        self
    }

    /// Materialize the log into a nested object.
    ///
    /// Pure: calling it repeatedly without recording anything in between
    /// returns equal values.
    ///
    /// # Errors
    ///
    /// Returns the error of the first action that fails to replay. No
    /// partial result is produced.
    pub fn value(&self) -> FoldResult<Value> {
        materialize::materialize(&self.log)
    }

    /// Materialize and read the value at a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`value`](ObjectBuilder::value).
    pub fn value_at(&self, key: &str) -> FoldResult<Option<Value>> {
        let value = self.value()?;
        Ok(path::get(&value, key).cloned())
    }

    /// Consume the builder and materialize it.
    ///
    /// # Errors
    ///
    /// Same as [`value`](ObjectBuilder::value).
    pub fn resolve(self) -> FoldResult<Value> {
        self.value()
    }

    /// Create a new builder holding only the part of this log selected by
    /// `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidPattern`] if a filter pattern fails to
    /// compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::{FilterSpec, ObjectBuilder};
    /// use serde_json::json;
    ///
    /// let mut builder = ObjectBuilder::new();
    /// builder.set("key1", "a").set("key2", "b").set("other", "c");
    ///
    /// let only_key2 = builder.clone_filtered("key2").unwrap();
    /// assert_eq!(only_key2.value().unwrap(), json!({"key2": "b"}));
    ///
    /// let keys = builder
    ///     .clone_filtered(FilterSpec::new().include("key").fuzzy(true))
    ///     .unwrap();
    /// assert_eq!(keys.value().unwrap(), json!({"key1": "a", "key2": "b"}));
    /// ```
    pub fn clone_filtered(&self, filter: impl Into<CloneFilter>) -> FoldResult<Self> {
        let actions = filter.into().apply(self.log.as_slice())?;
        log::debug!(
            "objectfold: cloned builder with {} of {} actions",
            actions.len(),
            self.log.len()
        );
        Ok(ObjectBuilder::from_actions(actions))
    }

    /// Like [`clone_filtered`](ObjectBuilder::clone_filtered), with the
    /// filter given as positional JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::UnknownFilterCondition`] if the arguments fit
    /// no filter shape (see [`CloneFilter::from_args`]).
    pub fn clone_with_args(&self, args: &[Value]) -> FoldResult<Self> {
        self.clone_filtered(CloneFilter::from_args(args)?)
    }

    /// An owned copy of the recorded actions.
    pub fn actions(&self) -> Vec<Action> {
        self.log.snapshot()
    }

    /// Borrow the underlying log.
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

impl From<ActionLog> for ObjectBuilder {
    fn from(log: ActionLog) -> Self {
        ObjectBuilder::from_log(log)
    }
}

fn positional<I, V>(first: Value, rest: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    std::iter::once(first)
        .chain(rest.into_iter().map(Into::into))
        .collect()
}

fn flatten_into(actions: &mut Vec<Action>, prefix: Option<&str>, map: Map<String, Value>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            Value::Object(child) => flatten_into(actions, Some(&path), child),
            leaf => actions.push(Action::new(ActionKind::Set, path, [leaf])),
        }
    }
}
