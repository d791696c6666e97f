//! Explanation shown when an intent cannot be performed.

use crate::paths::TransactionIntent;
use quorum_core::Address;

/// Why the action is impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpossibleReason {
    /// No path exists: the account likely lacks the permission.
    NoPermission,
    /// Path resolution or submission failed.
    PathError,
}

/// "Action impossible" notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionImpossible {
    /// Intent description, if any
    pub description: Option<String>,
    /// App name, if any
    pub name: Option<String>,
    /// Contract the intent targets
    pub to: Address,
    /// Cause
    pub reason: ImpossibleReason,
}

impl ActionImpossible {
    /// Notice title.
    pub const TITLE: &'static str = "Action impossible";

    /// Build the notice for an intent.
    pub fn new(intent: &TransactionIntent, reason: ImpossibleReason) -> Self {
        Self {
            description: intent.description.clone().filter(|d| !d.is_empty()),
            name: intent.name.clone().filter(|n| !n.is_empty()),
            to: intent.to,
            reason,
        }
    }

    /// Full notice text.
    pub fn text(&self) -> String {
        let subject = match (&self.description, &self.name) {
            (None, None) => "The action failed to execute".to_string(),
            (Some(description), None) => format!("The action “{description}” failed to execute"),
            (None, Some(name)) => format!("The action failed to execute on {name}"),
            (Some(description), Some(name)) => {
                format!("The action “{description}” failed to execute on {name}")
            }
        };
        let cause = match self.reason {
            ImpossibleReason::PathError => {
                "An error occurred when we tried to find a path or send a transaction for this action."
            }
            ImpossibleReason::NoPermission => "You may not have the required permissions.",
        };
        format!("{subject}. {cause}")
    }
}
