//! Account model and related types

use serde::{Deserialize, Serialize};

use crate::decimal::Amount;
use crate::model::currency::Currency;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Unique account identifier, assigned sequentially starting at 1
pub type AccountId = u64;

/// Account model
///
/// An account holds a single balance in a single currency. Accounts are
/// owned by the store, mutated only through ledger operations, and never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Account {
    /// Unique account ID
    pub id: AccountId,
    /// Account holder name
    pub name: String,
    /// Current balance, never negative after a committed operation
    pub balance: Amount,
    /// Currency the balance is denominated in
    pub currency: Currency,
}

/// Result of a committed transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct TransferOutcome {
    /// Source account ID
    pub from_account_id: AccountId,
    /// Source balance after the debit
    pub from_account_balance: Amount,
    /// Destination account ID
    pub to_account_id: AccountId,
    /// Destination balance after the credit
    pub to_account_balance: Amount,
    /// Amount credited to the destination, in its own currency
    pub converted_amount: Amount,
}
