//! Error types for building and materializing action logs.

use crate::action::ActionKind;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for objectfold operations.
pub type FoldResult<T> = Result<T, FoldError>;

/// Errors raised while replaying, filtering or serializing an action log.
///
/// Recording an action never fails. Every variant below except
/// [`FoldError::UnknownFilterCondition`], [`FoldError::NotAnObject`] and
/// [`FoldError::Serialization`] is detected lazily, when the log is replayed
/// by [`ObjectBuilder::value`](crate::ObjectBuilder::value).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FoldError {
    /// The action has an empty key.
    #[error("can't {action}: no key specified")]
    MissingKey {
        /// The kind of the failing action.
        action: ActionKind,
    },

    /// The action needs at least one argument and got none.
    #[error("can't {action} an empty value to {key}")]
    EmptyValue {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
    },

    /// The value at the key exists but is not an array.
    #[error("can't {action} {key}: it's not an array (found {found})")]
    NotAnArray {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
        /// Type name of the value that was found.
        found: &'static str,
    },

    /// The key does not hold any value.
    #[error("can't {action} {key}: array doesn't exist")]
    ArrayMissing {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
    },

    /// The index argument is missing or not a number.
    #[error("can't {action} {key}: index is not a number")]
    IndexNotNumber {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
    },

    /// The index argument is below zero.
    #[error("can't {action} {key}: index {index} can't be negative")]
    NegativeIndex {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
        /// The rejected index.
        index: f64,
    },

    /// No array element matched the locator.
    #[error("can't {action} {key}: item is not found")]
    ItemNotFound {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
    },

    /// The action was recorded with too few arguments.
    #[error("can't {action} {key}: expected at least {expected} arguments, got {found}")]
    InsufficientArguments {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
        /// Minimum number of arguments.
        expected: usize,
        /// Number of arguments recorded.
        found: usize,
    },

    /// Copy would overwrite an existing key without `overwrite` set.
    #[error("can't copy {key}: destination key {destination} already exists")]
    DestinationExists {
        /// The source key.
        key: String,
        /// The destination key.
        destination: String,
    },

    /// Copy source key is not present.
    #[error("can't copy {key}: key doesn't exist")]
    SourceMissing {
        /// The source key.
        key: String,
    },

    /// A key argument is neither a string nor a number.
    #[error("can't {action} {key}: key argument must be a string or a number, found {found}")]
    InvalidKeyType {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
        /// Type name of the rejected argument.
        found: &'static str,
    },

    /// An `in`/`nin` comparand is not an array.
    #[error("can't apply {operator} operator: value is not an array")]
    InvalidOperand {
        /// The operator name.
        operator: String,
    },

    /// A match spec names an operator that does not exist.
    #[error("unknown operator \"{operator}\"")]
    UnknownOperator {
        /// The operator name as written.
        operator: String,
    },

    /// Clone arguments have a shape no filter interpretation accepts.
    #[error("unknown action filtering condition: {reason}")]
    UnknownFilterCondition {
        /// What was wrong with the arguments.
        reason: String,
    },

    /// A key pattern failed to compile as a regular expression.
    #[error("invalid key pattern {pattern:?}")]
    InvalidPattern {
        /// The pattern as compiled (after anchoring).
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// An updater callable was passed where a JSON value is required.
    #[error("can't {action} {key}: a callable is only valid as an update replacement")]
    UnexpectedUpdater {
        /// The kind of the failing action.
        action: ActionKind,
        /// The action key.
        key: String,
    },

    /// `init` was given something that does not serialize to an object.
    #[error("can't initialize from {found}: an object is required")]
    NotAnObject {
        /// Type name of the rejected value.
        found: &'static str,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FoldError {
    /// Create an invalid pattern error.
    #[inline]
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        FoldError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create an unknown filter condition error.
    #[inline]
    pub fn unknown_filter(reason: impl Into<String>) -> Self {
        FoldError::UnknownFilterCondition {
            reason: reason.into(),
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
