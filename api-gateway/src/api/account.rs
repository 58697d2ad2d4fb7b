//! Ledger API handlers
//!
//! Handles the ledger endpoints:
//! - Create account
//! - Get account details
//! - Deposit and withdraw funds
//! - Transfer funds between accounts

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::decimal::Amount;
use common::model::account::{Account, AccountId, TransferOutcome};
use common::model::currency::Currency;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Create account request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Account holder name
    pub name: String,
    /// Opening balance
    pub initial_balance: Amount,
    /// Currency code
    pub currency: String,
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/create-account",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account successfully created"),
        (status = 400, description = "Unsupported currency or invalid opening balance"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ledger"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, ApiResponse<Account>), ApiError> {
    // Parsed here rather than in serde so an unknown code maps to the
    // unsupported-currency error instead of a deserialization failure
    let currency: Currency = request.currency.parse().map_err(ApiError::Common)?;

    let account = state
        .ledger
        .create_account(&request.name, request.initial_balance, currency)
        .map_err(ApiError::Common)?;

    Ok((StatusCode::CREATED, ApiResponse::new(account)))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(
        ("id" = u64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details retrieved successfully"),
        (status = 404, description = "Account not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ledger"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<AccountId>,
) -> Result<ApiResponse<Account>, ApiError> {
    let account = state.ledger.account(id).map_err(ApiError::Common)?;
    Ok(ApiResponse::new(account))
}

/// Deposit or withdraw request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountRequest {
    /// Account ID
    pub account_id: AccountId,
    /// Amount, must be positive
    pub amount: Amount,
}

/// New balance after a deposit or withdrawal
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    /// Account ID
    pub account_id: AccountId,
    /// Balance after the operation
    pub new_balance: Amount,
}

/// Deposit funds into an account
#[utoipa::path(
    post,
    path = "/deposit",
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Funds deposited successfully"),
        (status = 404, description = "Account not found"),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ledger"
)]
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AmountRequest>,
) -> Result<ApiResponse<BalanceResponse>, ApiError> {
    let new_balance = state
        .ledger
        .deposit(request.account_id, request.amount)
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(BalanceResponse {
        account_id: request.account_id,
        new_balance,
    }))
}

/// Withdraw funds from an account
#[utoipa::path(
    post,
    path = "/withdraw",
    request_body = AmountRequest,
    responses(
        (status = 200, description = "Funds withdrawn successfully"),
        (status = 404, description = "Account not found"),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ledger"
)]
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AmountRequest>,
) -> Result<ApiResponse<BalanceResponse>, ApiError> {
    let new_balance = state
        .ledger
        .withdraw(request.account_id, request.amount)
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(BalanceResponse {
        account_id: request.account_id,
        new_balance,
    }))
}

/// Transfer request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Source account ID
    pub from_account_id: AccountId,
    /// Destination account ID
    pub to_account_id: AccountId,
    /// Amount in the source account's currency, must be positive
    pub amount: Amount,
}

/// Transfer funds between accounts
#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Funds transferred successfully"),
        (status = 404, description = "One or both accounts not found"),
        (status = 400, description = "Invalid amount or insufficient funds"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "ledger"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TransferRequest>,
) -> Result<ApiResponse<TransferOutcome>, ApiError> {
    let outcome = state
        .ledger
        .transfer(
            request.from_account_id,
            request.to_account_id,
            request.amount,
        )
        .map_err(ApiError::Common)?;

    Ok(ApiResponse::new(outcome))
}
