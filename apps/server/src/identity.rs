//! JWT identity resolution.
//!
//! Handles bearer-token generation and validation, and turns a validated
//! token into the current actor. The credential check behind token
//! issuance (passwords, SSO) belongs to the user-management subsystem;
//! this module only signs and verifies.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_core::{Cashier, StaffRole};

use crate::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff id)
    pub sub: String,

    /// Staff role
    pub role: StaffRole,

    /// Branch the actor is assigned to
    pub branch_id: Option<String>,

    /// Store the actor belongs to (reserved for multi-store setups)
    pub store_id: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// The resolved identity of the calling request.
#[derive(Debug, Clone)]
pub struct CurrentActor {
    pub user_id: String,
    pub role: StaffRole,
    pub branch_id: Option<String>,
    pub store_id: Option<String>,
}

impl From<Claims> for CurrentActor {
    fn from(claims: Claims) -> Self {
        CurrentActor {
            user_id: claims.sub,
            role: claims.role,
            branch_id: claims.branch_id,
            store_id: claims.store_id,
        }
    }
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for a staff member.
    pub fn issue_token(&self, cashier: &Cashier) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: cashier.id.clone(),
            role: cashier.role,
            branch_id: cashier.branch_id.clone(),
            store_id: None,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}
