//! Configuration for the ledger core

use std::env;
use std::path::PathBuf;

/// Configuration for the ledger engine
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Optional path of the transaction log file
    pub transactions_log: Option<PathBuf>,
}

impl LedgerConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self {
            transactions_log: env::var("TRANSACTIONS_LOG").ok().map(PathBuf::from),
        }
    }

    /// Create a new configuration with custom values
    pub fn new(transactions_log: Option<PathBuf>) -> Self {
        Self { transactions_log }
    }
}
