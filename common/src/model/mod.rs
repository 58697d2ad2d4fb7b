//! Domain models shared across the ledger crates

pub mod account;
pub mod currency;
pub mod log;
