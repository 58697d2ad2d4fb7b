//! Common types and utilities for the ledger service
//!
//! This library contains shared types used across the ledger crates. It
//! provides a unified approach to error handling, decimal money amounts,
//! and the domain models (accounts, currencies, log entries).

pub mod decimal;
pub mod error;
pub mod model;

/// Re-export important types
pub use error::{Error, ErrorExt, Result};
pub use decimal::*;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
