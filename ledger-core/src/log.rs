//! Append-only transaction log
//!
//! Records successfully committed mutations as human-readable lines.
//! The log is informational only: it is not consulted for recovery and
//! recording never fails. Entries are kept in memory and, when a log file
//! is configured, mirrored there as `<timestamp> <action>: <detail>` lines.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use common::error::{Error, Result};
use common::model::log::{ActionKind, LogEntry};
use tracing::info;

/// Append-only record of executed ledger mutations
pub struct TransactionLog {
    entries: Mutex<Vec<LogEntry>>,
    file: Option<Mutex<File>>,
}

impl TransactionLog {
    /// Create an in-memory log
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            file: None,
        }
    }

    /// Create a log that also appends lines to a file
    pub fn with_file(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::ConfigurationError(format!(
                    "Cannot open transaction log {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            entries: Mutex::new(Vec::new()),
            file: Some(Mutex::new(file)),
        })
    }

    /// Append an entry; never fails
    ///
    /// Append order matches the commit order of each recorded operation.
    /// File write errors are swallowed: the ledger operation has already
    /// committed and the log is observational.
    pub fn record(&self, action: ActionKind, detail: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            action,
            detail: detail.into(),
        };

        info!(target: "transactions", "{}: {}", entry.action, entry.detail);

        if let Some(file) = &self.file {
            let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = writeln!(file, "{}", entry.format_line());
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);
    }

    /// Copy of the recorded entries, in append order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}
