//! Application configuration

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API port
    pub port: u16,
    /// Secret used to sign and verify tokens
    pub jwt_secret: String,
    /// Username of the single shared admin identity
    pub admin_username: String,
    /// Password of the single shared admin identity
    pub admin_password: String,
    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,
    /// Rate limiting knobs
    pub rate_limit: RateLimitConfig,
    /// Optional path of the transaction log file
    pub transactions_log: Option<PathBuf>,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether the limiter is active
    pub enabled: bool,
    /// Sustained requests per minute per client IP
    pub per_minute: u32,
    /// Burst allowance per client IP
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            burst: env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "insecure-dev-secret".to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password".to_string()),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            rate_limit: RateLimitConfig::default(),
            transactions_log: env::var("TRANSACTIONS_LOG").ok().map(PathBuf::from),
        }
    }
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }
}
