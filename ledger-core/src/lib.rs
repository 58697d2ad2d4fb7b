//! Account ledger and transfer engine
//!
//! The core of the ledger service: account storage, deposit/withdraw/transfer
//! semantics, currency conversion against a static exchange-rate table, and
//! an append-only transaction log. All state is process memory; restart loses
//! all accounts. This crate knows nothing about HTTP, tokens, or rate limits.

pub mod config;
pub mod engine;
pub mod log;
pub mod rates;
pub mod store;

pub use config::LedgerConfig;
pub use engine::LedgerEngine;
pub use log::TransactionLog;
pub use rates::ExchangeRateTable;
pub use store::AccountStore;
