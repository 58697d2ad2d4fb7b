//! Transaction log entry model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Kind of ledger action recorded in the transaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub enum ActionKind {
    /// Account creation
    Create,
    /// Funds added to an account
    Deposit,
    /// Funds removed from an account
    Withdraw,
    /// Funds moved between two accounts
    Transfer,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Create => "Create",
            ActionKind::Deposit => "Deposit",
            ActionKind::Withdraw => "Withdraw",
            ActionKind::Transfer => "Transfer",
        };
        f.write_str(name)
    }
}

/// Append-only transaction log entry
///
/// Entries are purely observational; they carry no identity beyond their
/// position in the log and are not used for recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct LogEntry {
    /// Time the operation committed
    pub timestamp: DateTime<Utc>,
    /// Action kind
    pub action: ActionKind,
    /// Free-form detail string
    pub detail: String,
}

impl LogEntry {
    /// Render the entry as a single human-readable log line
    pub fn format_line(&self) -> String {
        format!(
            "{} {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.action,
            self.detail
        )
    }
}
