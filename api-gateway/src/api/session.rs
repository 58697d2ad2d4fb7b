//! Session API handlers
//!
//! Issues tokens for the single shared admin identity.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::auth::issue_token;
use crate::error::ApiError;
use crate::AppState;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Login response carrying a signed token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed access token
    pub token: String,
}

/// Authenticate and obtain an access token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "session"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let config = &state.config;
    if request.username != config.admin_username || request.password != config.admin_password {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(
        &request.username,
        &config.jwt_secret,
        config.token_ttl_minutes,
    )
    .map_err(ApiError::Common)?;

    tracing::info!(user = %request.username, "Issued access token");
    Ok(ApiResponse::new(LoginResponse { token }))
}
