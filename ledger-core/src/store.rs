//! Account storage
//!
//! The store owns the account map and the id counter; nothing outside its
//! methods can reach either. Each account sits behind its own mutex so that
//! operations on disjoint accounts run fully concurrently while ledger
//! operations hold exclusivity for the whole check-then-mutate sequence.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::decimal::Amount;
use common::error::{Error, Result};
use common::model::account::{Account, AccountId};
use common::model::currency::Currency;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

/// Shared handle to a single account
pub type AccountHandle = Arc<Mutex<Account>>;

/// Lock an account, recovering the guard if a holder panicked
///
/// Balance mutations are plain decimal arithmetic performed after all
/// validation, so a poisoned guard never exposes a torn write.
pub(crate) fn lock(account: &Mutex<Account>) -> MutexGuard<'_, Account> {
    account.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory account store
pub struct AccountStore {
    /// Accounts by ID
    accounts: DashMap<AccountId, AccountHandle>,
    /// Next id to assign; ids start at 1 and are never reused
    next_id: AtomicU64,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new account
    ///
    /// Fails with `InvalidAmount` for a negative opening balance (a zero
    /// opening balance is permitted). The account is visible to lookups as
    /// soon as this returns.
    pub fn create(&self, name: &str, initial_balance: Amount, currency: Currency) -> Result<Account> {
        if initial_balance < Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "Initial balance must not be negative, got {}",
                initial_balance
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = Account {
            id,
            name: name.to_string(),
            balance: initial_balance,
            currency,
        };
        self.accounts.insert(id, Arc::new(Mutex::new(account.clone())));

        debug!(account_id = id, %currency, "Created account");
        Ok(account)
    }

    /// Get a mutable handle to an account
    pub fn get(&self, id: AccountId) -> Result<AccountHandle> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::AccountNotFound(id.to_string()))
    }

    /// Read-only copy of an account's current state
    pub fn snapshot(&self, id: AccountId) -> Result<Account> {
        let handle = self.get(id)?;
        let guard = lock(&handle);
        Ok(guard.clone())
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
