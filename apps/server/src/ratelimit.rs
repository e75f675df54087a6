//! Rate-limit middleware.
//!
//! Consulted once per inbound request before any handler runs. One
//! counter per (client IP, bucket); rejection short-circuits with 429 and
//! never reaches the business methods.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use tally_core::RateBucket;

use crate::error::ApiError;
use crate::state::AppState;

/// Which bucket a request path falls into.
///
/// Authentication endpoints get the strict limit to blunt brute-force
/// attempts; everything else shares the general limit.
pub fn bucket_for_path(path: &str) -> RateBucket {
    if path.starts_with("/auth") {
        RateBucket::Auth
    } else {
        RateBucket::General
    }
}

/// Axum middleware: check-and-increment the caller's window counter.
pub async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let bucket = bucket_for_path(req.uri().path());
    let client = addr.ip().to_string();

    if !state.limiter.check(&client, bucket) {
        warn!(client = %client, bucket = ?bucket, path = %req.uri().path(), "Rate limit exceeded");
        return ApiError::TooManyRequests.into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_classification() {
        assert_eq!(bucket_for_path("/auth/token"), RateBucket::Auth);
        assert_eq!(bucket_for_path("/shifts/start"), RateBucket::General);
        assert_eq!(bucket_for_path("/shifts/progress"), RateBucket::General);
        assert_eq!(bucket_for_path("/"), RateBucket::General);
    }
}
