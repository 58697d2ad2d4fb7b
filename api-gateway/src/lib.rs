//! HTTP gateway for the ledger service
//!
//! Thin plumbing around the ledger core: JSON routing, JWT authentication,
//! per-IP rate limiting, and error-to-status mapping. The core is built
//! before the router and knows nothing about any of this.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod rate_limit;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use ledger_core::LedgerEngine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::account::{create_account, deposit, get_account, transfer, withdraw};
use crate::api::session::login;
use crate::config::AppConfig;
use crate::rate_limit::RateLimitLayer;

/// App state shared across handlers
pub struct AppState {
    /// Ledger engine
    pub ledger: Arc<LedgerEngine>,
    /// Gateway configuration
    pub config: Arc<AppConfig>,
}

/// Build the service router
///
/// `/login` is open; every ledger route sits behind the token check. The
/// rate limiter wraps the whole router when enabled; the caller owns the
/// layer so it can run the bucket cleanup task.
pub fn router(state: Arc<AppState>, rate_limit: RateLimitLayer) -> Router {
    let ledger_routes = Router::new()
        .route("/create-account", post(create_account))
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/transfer", post(transfer))
        .route("/accounts/:id", get(get_account))
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_token,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(login))
        .merge(ledger_routes)
        .fallback(error::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(rate_limit)
        .with_state(state)
}
