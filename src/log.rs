use crate::action::Action;
use crate::error::FoldResult;

/// An ordered, append-only sequence of actions.
///
/// Owned by exactly one [`ObjectBuilder`](crate::ObjectBuilder). Reads that
/// hand actions out ([`snapshot`](ActionLog::snapshot)) return copies, so
/// later appends never show up in a snapshot taken earlier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionLog {
    actions: Vec<Action>,
}

impl ActionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log seeded with `actions`, in order.
    pub fn from_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        ActionLog {
            actions: actions.into_iter().collect(),
        }
    }

    /// Append an action. Returns its position in the log.
    pub fn append(&mut self, action: Action) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// Append several actions, preserving their order.
    pub fn extend(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.actions.extend(actions);
    }

    /// Drop every action.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// An owned copy of the current actions.
    pub fn snapshot(&self) -> Vec<Action> {
        self.actions.clone()
    }

    /// Borrow the actions in order.
    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    /// Iterate over the actions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Serialize the log as JSON lines, one action per line, each line
    /// terminated by `\n`.
    ///
    /// # Errors
    ///
    /// Fails with [`FoldError::Serialization`](crate::FoldError::Serialization)
    /// if an action carries an [`Updater`](crate::Updater).
    ///
    /// # Examples
    ///
    /// ```
    /// use objectfold::{Action, ActionKind, ActionLog};
    /// use serde_json::json;
    ///
    /// let log = ActionLog::from_actions([
    ///     Action::new(ActionKind::Set, "a", [json!(1)]),
    ///     Action::new(ActionKind::Delete, "a", Vec::<serde_json::Value>::new()),
    /// ]);
    /// let text = log.to_json_lines().unwrap();
    /// assert_eq!(text.lines().count(), 2);
    /// assert_eq!(ActionLog::from_json_lines(&text).unwrap(), log);
    /// ```
    pub fn to_json_lines(&self) -> FoldResult<String> {
        let mut out = String::new();
        for action in &self.actions {
            out.push_str(&serde_json::to_string(action)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Parse a log written by [`to_json_lines`](ActionLog::to_json_lines).
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Fails with [`FoldError::Serialization`](crate::FoldError::Serialization)
    /// on the first line that is not a valid action.
    pub fn from_json_lines(text: &str) -> FoldResult<Self> {
        let mut log = ActionLog::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            log.append(serde_json::from_str(line)?);
        }
        Ok(log)
    }
}

impl<'a> IntoIterator for &'a ActionLog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
