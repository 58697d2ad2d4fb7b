//! Ledger engine
//!
//! Deposit, withdraw, and transfer as atomic operations over one or two
//! accounts. Every operation holds the exclusivity of each touched account
//! for the full check-then-mutate sequence, so partial effects are never
//! observable. Transfers lock both accounts in ascending account-id order,
//! which keeps two concurrent opposite-direction transfers from
//! deadlocking.

use std::sync::Arc;

use common::decimal::Amount;
use common::error::{Error, ErrorExt, Result};
use common::model::account::{Account, AccountId, TransferOutcome};
use common::model::currency::Currency;
use common::model::log::ActionKind;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::LedgerConfig;
use crate::log::TransactionLog;
use crate::rates::ExchangeRateTable;
use crate::store::{lock, AccountStore};

/// Ledger engine owning the account store, rate table, and transaction log
pub struct LedgerEngine {
    store: AccountStore,
    rates: Arc<ExchangeRateTable>,
    log: TransactionLog,
}

impl LedgerEngine {
    /// Create an engine with the built-in rate table and an in-memory log
    pub fn new() -> Self {
        Self::with_table(ExchangeRateTable::default())
    }

    /// Create an engine with a specific rate table and an in-memory log
    pub fn with_table(rates: ExchangeRateTable) -> Self {
        Self {
            store: AccountStore::new(),
            rates: Arc::new(rates),
            log: TransactionLog::new(),
        }
    }

    /// Create an engine from a configuration
    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        let log = match &config.transactions_log {
            Some(path) => TransactionLog::with_file(path)?,
            None => TransactionLog::new(),
        };

        Ok(Self {
            store: AccountStore::new(),
            rates: Arc::new(ExchangeRateTable::default()),
            log,
        })
    }

    /// The exchange-rate table in use
    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    /// The transaction log
    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    /// Create a new account
    ///
    /// The currency must be carried by the exchange-rate table.
    pub fn create_account(
        &self,
        name: &str,
        initial_balance: Amount,
        currency: Currency,
    ) -> Result<Account> {
        if !self.rates.supports(currency) {
            return Err(Error::UnsupportedCurrency(currency.to_string()));
        }
        let account = self.store.create(name, initial_balance, currency)?;
        info!(account_id = account.id, %currency, "Created account");
        self.log.record(
            ActionKind::Create,
            format!(
                "Account {} ({}): opened with {} {}",
                account.id, account.name, account.balance, account.currency
            ),
        );
        Ok(account)
    }

    /// Read-only snapshot of an account
    pub fn account(&self, id: AccountId) -> Result<Account> {
        self.store.snapshot(id)
    }

    /// Add funds to an account, returning the new balance
    pub fn deposit(&self, id: AccountId, amount: Amount) -> Result<Amount> {
        validate_amount(amount)?;

        let handle = self.store.get(id).with_context(|| "Deposit")?;
        let new_balance = {
            let mut account = lock(&handle);
            account.balance = credit(account.balance, amount, id)?;
            account.balance
        };

        info!(account_id = id, %amount, "Deposit");
        self.log
            .record(ActionKind::Deposit, format!("Account {}: +{}", id, amount));
        Ok(new_balance)
    }

    /// Remove funds from an account, returning the new balance
    pub fn withdraw(&self, id: AccountId, amount: Amount) -> Result<Amount> {
        validate_amount(amount)?;

        let handle = self.store.get(id).with_context(|| "Withdraw")?;
        let new_balance = {
            let mut account = lock(&handle);
            if account.balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "Account {}: balance {} cannot cover {}",
                    id, account.balance, amount
                )));
            }
            account.balance = debit(account.balance, amount, id)?;
            account.balance
        };

        info!(account_id = id, %amount, "Withdraw");
        self.log
            .record(ActionKind::Withdraw, format!("Account {}: -{}", id, amount));
        Ok(new_balance)
    }

    /// Move funds between two accounts, converting between currencies
    ///
    /// The funds check happens on the source balance in the source currency,
    /// before conversion: the sender always parts with exactly `amount` of
    /// their own currency while the receiver is credited the converted
    /// amount. Transfers from an account to itself are permitted.
    pub fn transfer(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: Amount,
    ) -> Result<TransferOutcome> {
        validate_amount(amount)?;

        let from_handle = self.store.get(from_id).with_context(|| "Transfer source")?;
        let to_handle = self.store.get(to_id).with_context(|| "Transfer destination")?;

        let outcome = if from_id == to_id {
            let mut account = lock(&from_handle);
            if account.balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "Account {}: balance {} cannot cover {}",
                    from_id, account.balance, amount
                )));
            }
            let converted = self.rates.convert(amount, account.currency, account.currency)?;
            account.balance = credit(debit(account.balance, amount, from_id)?, converted, to_id)?;
            TransferOutcome {
                from_account_id: from_id,
                from_account_balance: account.balance,
                to_account_id: to_id,
                to_account_balance: account.balance,
                converted_amount: converted,
            }
        } else {
            // Both locks taken in ascending id order before the funds check
            let (mut low, mut high) = if from_id < to_id {
                let low = lock(&from_handle);
                let high = lock(&to_handle);
                (low, high)
            } else {
                let low = lock(&to_handle);
                let high = lock(&from_handle);
                (low, high)
            };
            let (from_account, to_account) = if from_id < to_id {
                (&mut *low, &mut *high)
            } else {
                (&mut *high, &mut *low)
            };

            if from_account.balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "Account {}: balance {} cannot cover {}",
                    from_id, from_account.balance, amount
                )));
            }

            let converted =
                self.rates
                    .convert(amount, from_account.currency, to_account.currency)?;
            // Both new balances computed before either account is touched,
            // so an overflow on the credit side never commits the debit
            let new_from = debit(from_account.balance, amount, from_id)?;
            let new_to = credit(to_account.balance, converted, to_id)?;
            from_account.balance = new_from;
            to_account.balance = new_to;

            TransferOutcome {
                from_account_id: from_id,
                from_account_balance: from_account.balance,
                to_account_id: to_id,
                to_account_balance: to_account.balance,
                converted_amount: converted,
            }
        };

        info!(from = from_id, to = to_id, %amount, "Transfer");
        self.log.record(
            ActionKind::Transfer,
            format!("From {} to {}: {}", from_id, to_id, amount),
        );
        Ok(outcome)
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject zero and negative operation amounts
fn validate_amount(amount: Amount) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

fn credit(balance: Amount, amount: Amount, id: AccountId) -> Result<Amount> {
    balance
        .checked_add(amount)
        .ok_or_else(|| Error::InvalidAmount(format!("Balance overflow on account {}", id)))
}

fn debit(balance: Amount, amount: Amount, id: AccountId) -> Result<Amount> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| Error::InvalidAmount(format!("Balance overflow on account {}", id)))
}
