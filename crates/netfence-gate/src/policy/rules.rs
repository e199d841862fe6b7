//! Rule types for the prefix gate.

use serde::{Deserialize, Serialize};

use netfence_core::NetPrefix;

/// Action a rule (or the table default) applies to matching addresses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Permit the connection.
    #[default]
    Allow,
    /// Reject the connection.
    Deny,
}

impl Action {
    /// True when this action rejects traffic.
    pub fn is_deny(self) -> bool {
        matches!(self, Action::Deny)
    }
}

/// One policy statement: a prefix and the action applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixRule {
    pub prefix: NetPrefix,
    pub action: Action,
}
