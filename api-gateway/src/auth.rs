//! Token issuance and verification
//!
//! A single shared admin identity authenticates with username/password and
//! receives a short-lived HS256 token. Ledger routes accept the token in the
//! `x-access-tokens` header or as an `Authorization: Bearer` value.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use common::error::{Error, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the access token
pub const TOKEN_HEADER: &str = "x-access-tokens";

/// Token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user
    pub sub: String,
    /// Expiry as a unix timestamp
    pub exp: usize,
}

/// Issue a signed token for the given user
pub fn issue_token(username: &str, secret: &str, ttl_minutes: i64) -> Result<String> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a token signature and expiry, returning its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| Error::AuthorizationError(format!("Invalid token: {}", e)))
}

/// Middleware guarding the ledger routes
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let token = extract_token(&req)
        .ok_or_else(|| ApiError::Unauthorized("Token is missing".to_string()))?;

    let claims = verify_token(&token, &state.config.jwt_secret).map_err(ApiError::Common)?;
    tracing::debug!(user = %claims.sub, "Authenticated request");

    Ok(next.run(req).await)
}

fn extract_token(req: &Request) -> Option<String> {
    if let Some(token) = req.headers().get(TOKEN_HEADER) {
        if let Ok(value) = token.to_str() {
            return Some(value.to_string());
        }
    }

    if let Some(auth) = req.headers().get(AUTHORIZATION) {
        if let Ok(value) = auth.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let token = issue_token("admin", "secret", 30).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("admin", "secret", 30).unwrap();
        let err = verify_token(&token, "other").unwrap_err();
        assert!(matches!(err, Error::AuthorizationError(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default validation leeway
        let token = issue_token("admin", "secret", -10).unwrap();
        let err = verify_token(&token, "secret").unwrap_err();
        assert!(matches!(err, Error::AuthorizationError(_)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = verify_token("not-a-token", "secret").unwrap_err();
        assert!(matches!(err, Error::AuthorizationError(_)));
    }
}
