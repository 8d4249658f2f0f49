//! Selecting a subset of an action log by key pattern.
//!
//! Used by [`ObjectBuilder::clone_filtered`](crate::ObjectBuilder::clone_filtered)
//! to branch a builder with only part of its history.

use crate::action::Action;
use crate::error::{FoldError, FoldResult};
use crate::matcher::truthy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Include/exclude patterns for cloning.
///
/// Deserializes from `{"include": "a" | ["a", ...], "exclude": ..., "fuzzy": bool}`;
/// every field is optional.
///
/// # Examples
///
/// ```
/// use objectfold::FilterSpec;
/// use serde_json::json;
///
/// let spec: FilterSpec = serde_json::from_value(json!({"include": "key2"})).unwrap();
/// assert_eq!(spec, FilterSpec::new().include("key2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Keep only actions whose key matches one of these patterns.
    #[serde(deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    /// Drop actions whose key matches any of these patterns.
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,
    /// Match patterns unanchored.
    pub fuzzy: bool,
}

impl FilterSpec {
    /// An empty spec: keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Set unanchored matching.
    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Keep the include matches of `actions`, minus the exclude matches.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidPattern`] if a pattern fails to compile.
    pub fn apply(&self, actions: &[Action]) -> FoldResult<Vec<Action>> {
        filter_actions(actions, &self.include, &self.exclude, self.fuzzy)
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

/// How a clone selects the history it keeps.
///
/// Typed callers build one through the `From` impls:
///
/// ```
/// use objectfold::{CloneFilter, FilterSpec};
///
/// assert_eq!(CloneFilter::from("key2"), CloneFilter::Include(vec!["key2".into()]));
/// assert_eq!(
///     CloneFilter::from(["a", "b"]),
///     CloneFilter::Include(vec!["a".into(), "b".into()])
/// );
/// let spec = FilterSpec::new().exclude("key1");
/// assert_eq!(CloneFilter::from(spec.clone()), CloneFilter::Spec(spec));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CloneFilter {
    /// Keep the whole log.
    #[default]
    All,
    /// Keep actions matching any of these anchored patterns.
    Include(Vec<String>),
    /// Full include/exclude/fuzzy control.
    Spec(FilterSpec),
}

impl CloneFilter {
    /// Interpret positional clone arguments given as JSON.
    ///
    /// - no arguments: the whole log
    /// - two or more strings, or one array of strings: an include list
    /// - one string: a single include pattern
    /// - one object with `include` and/or `exclude`: a [`FilterSpec`]
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::UnknownFilterCondition`] for any other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::{CloneFilter, FilterSpec};
    /// use serde_json::json;
    ///
    /// let filter = CloneFilter::from_args(&[json!({"include": ["key"], "fuzzy": true})]).unwrap();
    /// assert_eq!(filter, CloneFilter::Spec(FilterSpec::new().include("key").fuzzy(true)));
    ///
    /// assert!(CloneFilter::from_args(&[json!(42)]).is_err());
    /// ```
    pub fn from_args(args: &[Value]) -> FoldResult<Self> {
        match args {
            [] => Ok(CloneFilter::All),
            [Value::String(s)] => Ok(CloneFilter::Include(vec![s.clone()])),
            [Value::Array(items)] => Ok(CloneFilter::Include(strings(items)?)),
            [Value::Object(obj)] => {
                let selects = ["include", "exclude"]
                    .iter()
                    .any(|k| obj.get(*k).is_some_and(truthy));
                if !selects {
                    return Err(FoldError::unknown_filter(
                        "object has neither include nor exclude",
                    ));
                }
                let spec = FilterSpec::deserialize(&args[0])
                    .map_err(|e| FoldError::unknown_filter(e.to_string()))?;
                Ok(CloneFilter::Spec(spec))
            }
            [_] => Err(FoldError::unknown_filter(
                "expected a string, an array or an options object",
            )),
            many => Ok(CloneFilter::Include(strings(many)?)),
        }
    }

    /// Apply the filter to `actions`, returning an owned copy of what is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FoldError::InvalidPattern`] if a pattern fails to compile.
    pub fn apply(&self, actions: &[Action]) -> FoldResult<Vec<Action>> {
        match self {
            CloneFilter::All => Ok(actions.to_vec()),
            CloneFilter::Include(patterns) => filter_actions(actions, patterns, &[], false),
            CloneFilter::Spec(spec) => spec.apply(actions),
        }
    }
}

fn strings(values: &[Value]) -> FoldResult<Vec<String>> {
    values
        .iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                FoldError::unknown_filter("include patterns must be strings")
            })
        })
        .collect()
}

impl From<&str> for CloneFilter {
    fn from(pattern: &str) -> Self {
        CloneFilter::Include(vec![pattern.to_string()])
    }
}

impl From<String> for CloneFilter {
    fn from(pattern: String) -> Self {
        CloneFilter::Include(vec![pattern])
    }
}

impl From<Vec<String>> for CloneFilter {
    fn from(patterns: Vec<String>) -> Self {
        CloneFilter::Include(patterns)
    }
}

impl From<&[&str]> for CloneFilter {
    fn from(patterns: &[&str]) -> Self {
        CloneFilter::Include(patterns.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CloneFilter {
    fn from(patterns: [&str; N]) -> Self {
        CloneFilter::Include(patterns.iter().map(|p| p.to_string()).collect())
    }
}

impl From<FilterSpec> for CloneFilter {
    fn from(spec: FilterSpec) -> Self {
        CloneFilter::Spec(spec)
    }
}

/// Keep the actions selected by `include`, then drop those hit by `exclude`.
///
/// An empty `include` keeps everything; an empty `exclude` drops nothing.
/// Patterns are regular expressions tested against the action key. Unless
/// `fuzzy` is set they are anchored at both ends first.
///
/// # Errors
///
/// Returns [`FoldError::InvalidPattern`] if a pattern fails to compile.
///
/// # Examples
///
/// ```
/// use objectfold::{Action, ActionKind, filter_actions};
/// use serde_json::json;
///
/// let actions: Vec<Action> = ["key1", "key2", "other"]
///     .iter()
///     .map(|k| Action::new(ActionKind::Set, *k, [json!(1)]))
///     .collect();
///
/// let include = vec!["key\\d".to_string()];
/// let exclude = vec!["key1".to_string()];
/// let kept = filter_actions(&actions, &include, &exclude, false).unwrap();
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].key, "key2");
/// ```
pub fn filter_actions(
    actions: &[Action],
    include: &[String],
    exclude: &[String],
    fuzzy: bool,
) -> FoldResult<Vec<Action>> {
    let include = prepare_patterns(include, fuzzy)?;
    let exclude = prepare_patterns(exclude, fuzzy)?;

    let kept: Vec<Action> = actions
        .iter()
        .filter(|a| include.is_empty() || include.iter().any(|re| re.is_match(&a.key)))
        .filter(|a| !exclude.iter().any(|re| re.is_match(&a.key)))
        .cloned()
        .collect();

    log::debug!(
        "objectfold: filtered {} actions down to {}",
        actions.len(),
        kept.len()
    );
    Ok(kept)
}

fn prepare_patterns(patterns: &[String], fuzzy: bool) -> FoldResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let expr = if fuzzy { p.clone() } else { anchor(p) };
            Regex::new(&expr).map_err(|e| FoldError::invalid_pattern(expr, e))
        })
        .collect()
}

/// Add `^` and `$` unless the pattern already starts/ends with them.
fn anchor(pattern: &str) -> String {
    let head = if pattern.starts_with('^') { "" } else { "^" };
    let tail = if pattern.ends_with('$') { "" } else { "$" };
    format!("{head}{pattern}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("key"), "^key$");
        assert_eq!(anchor("^key"), "^key$");
        assert_eq!(anchor("key$"), "^key$");
        assert_eq!(anchor(""), "^$");
    }
}
