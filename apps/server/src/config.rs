//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT token lifetime in seconds
    pub jwt_lifetime_secs: i64,

    /// Requests per minute per client for /auth endpoints
    pub rate_limit_auth_per_minute: u32,

    /// Requests per minute per client for everything else
    pub rate_limit_general_per_minute: u32,

    /// Cashier to attribute requests to when no bearer token is present.
    ///
    /// This is the explicit, named form of the "no auth in test/demo
    /// setups" fallback. Leave unset in production: requests without
    /// identity are then rejected instead of silently attributed.
    pub fallback_cashier_id: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./tally.db".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                // In production this MUST be set via environment variable
                .unwrap_or_else(|_| "tally-dev-secret-change-in-production".to_string()),

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string()) // 1 hour
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,

            rate_limit_auth_per_minute: env::var("RATE_LIMIT_AUTH_PER_MINUTE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("RATE_LIMIT_AUTH_PER_MINUTE".to_string())
                })?,

            rate_limit_general_per_minute: env::var("RATE_LIMIT_GENERAL_PER_MINUTE")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("RATE_LIMIT_GENERAL_PER_MINUTE".to_string())
                })?,

            fallback_cashier_id: env::var("FALLBACK_CASHIER_ID").ok(),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
