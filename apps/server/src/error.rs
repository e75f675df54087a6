//! API error types and their HTTP mapping.
//!
//! Engine errors propagate here unmodified and are translated once, at
//! the boundary:
//!
//! ```text
//! CoreError::*NotFound      → 404 Not Found
//! CoreError::NoActiveShift  → 409 Conflict      (InvalidState)
//! CoreError::NoBranch       → 400 Bad Request   (ValidationFailure)
//! StoreError::*             → 500 Internal Server Error
//! rate limit rejection      → 429 Too Many Requests
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tally_core::CoreError;
use tally_shift::ShiftError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded. Please try again later.")]
    TooManyRequests,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ShiftError> for ApiError {
    fn from(err: ShiftError) -> Self {
        match err {
            ShiftError::Domain(domain) => match &domain {
                CoreError::CashierNotFound(_)
                | CoreError::BranchNotFound(_)
                | CoreError::ShiftNotFound(_) => ApiError::NotFound(domain.to_string()),
                CoreError::NoActiveShift(_) => ApiError::InvalidState(domain.to_string()),
                CoreError::NoBranch(_) => ApiError::Validation(domain.to_string()),
            },
            ShiftError::Store(store) => ApiError::Internal(store.to_string()),
        }
    }
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body sent to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_shift::StoreError;

    #[test]
    fn test_domain_error_mapping() {
        let err: ApiError = ShiftError::Domain(CoreError::ShiftNotFound("s-1".into())).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = ShiftError::Domain(CoreError::NoActiveShift("c-1".into())).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = ShiftError::Domain(CoreError::NoBranch("c-1".into())).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_error_is_internal() {
        let err: ApiError = ShiftError::Store(StoreError::Backend("db down".into())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rate_limit_status() {
        assert_eq!(ApiError::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            success: false,
            message: "Rate limit exceeded. Please try again later.".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], serde_json::json!(false));
        assert!(json["message"].as_str().unwrap().contains("Rate limit"));
    }
}
