//! API handlers

pub mod account;
pub mod response;
pub mod session;
