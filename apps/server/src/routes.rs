//! HTTP route handlers.
//!
//! Handlers stay thin: resolve the calling cashier, delegate to the
//! [`ShiftManager`](tally_shift::ShiftManager), serialize the result.
//! All request/response bodies are camelCase JSON.
//!
//! ## Identity Resolution
//! An explicit `cashierId` in the request wins, then the bearer token's
//! subject, then the configured fallback cashier (test/demo setups with
//! no auth - an explicit config option, not a hidden default). With none
//! of the three, the request is rejected.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use tally_core::ShiftSession;
use tally_shift::ShiftOverview;

use crate::error::ApiError;
use crate::identity::{extract_bearer_token, CurrentActor};
use crate::ratelimit::rate_limit;
use crate::state::AppState;

// =============================================================================
// Router
// =============================================================================

/// Builds the application router with rate limiting and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/token", post(issue_token))
        .route("/shifts/start", post(start_shift))
        .route("/shifts/end", post(end_shift))
        .route("/shifts/progress", get(current_progress))
        .route("/shifts/by-date", get(get_by_cashier_and_date))
        .route("/shifts/by-branch/{branch_id}", get(list_by_branch))
        .route("/shifts/by-cashier/{cashier_id}", get(list_by_cashier))
        .route("/shifts/{id}", get(get_by_id))
        .route("/shifts", get(list_all))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Identity Helpers
// =============================================================================

/// The actor carried by the bearer token, if any.
fn actor_from_headers(headers: &HeaderMap, state: &AppState) -> Option<CurrentActor> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    let token = extract_bearer_token(auth)?;
    match state.jwt.validate_token(token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            debug!(error = %e, "Ignoring invalid bearer token");
            None
        }
    }
}

/// Explicit parameter → token subject → configured fallback.
fn resolve_cashier_id(
    explicit: Option<String>,
    actor: &Option<CurrentActor>,
    state: &AppState,
) -> Result<String, ApiError> {
    explicit
        .or_else(|| actor.as_ref().map(|a| a.user_id.clone()))
        .or_else(|| state.config.fallback_cashier_id.clone())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "No cashier identity: supply a bearer token or an explicit cashierId".to_string(),
            )
        })
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest {
    cashier_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    token: String,
    token_type: String,
}

/// Issues a bearer token for a known staff member.
///
/// Demo/test issuance: the real credential check (passwords, SSO) lives
/// in the user-management subsystem, outside this backend.
async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let cashier = state
        .staff
        .require_cashier(&body.cashier_id)
        .await
        .map_err(|e| match e {
            tally_db::DbError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        })?;

    let token = state.jwt.issue_token(&cashier)?;
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

// =============================================================================
// Shift Lifecycle
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartShiftRequest {
    cashier_id: Option<String>,
    branch_id: Option<String>,
    shift_start: Option<DateTime<Utc>>,
}

/// POST /shifts/start - open (or return) today's session.
async fn start_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<StartShiftRequest>,
) -> Result<Json<ShiftSession>, ApiError> {
    let actor = actor_from_headers(&headers, &state);
    let cashier_id = resolve_cashier_id(body.cashier_id, &actor, &state)?;

    let session = state
        .manager
        .start(&cashier_id, body.branch_id.as_deref(), body.shift_start)
        .await?;
    Ok(Json(session))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndShiftRequest {
    shift_id: Option<String>,
    shift_end: Option<DateTime<Utc>>,
}

/// POST /shifts/end - close a session and fix its totals.
async fn end_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EndShiftRequest>,
) -> Result<Json<ShiftOverview>, ApiError> {
    let actor = actor_from_headers(&headers, &state);
    let cashier_id = resolve_cashier_id(None, &actor, &state)?;

    let overview = state
        .manager
        .end(&cashier_id, body.shift_id.as_deref(), body.shift_end)
        .await?;
    Ok(Json(overview))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressQuery {
    cashier_id: Option<String>,
}

/// GET /shifts/progress - live, side-effect-free reconciliation.
async fn current_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ShiftOverview>, ApiError> {
    let actor = actor_from_headers(&headers, &state);
    let cashier_id = resolve_cashier_id(query.cashier_id, &actor, &state)?;

    let overview = state.manager.current_progress(&cashier_id).await?;
    Ok(Json(overview))
}

// =============================================================================
// Queries
// =============================================================================

/// GET /shifts/{id}
async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShiftOverview>, ApiError> {
    Ok(Json(state.manager.get_by_id(&id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByDateQuery {
    cashier_id: String,
    /// Calendar date, `YYYY-MM-DD` (UTC).
    date: NaiveDate,
}

/// GET /shifts/by-date?cashierId=…&date=YYYY-MM-DD
async fn get_by_cashier_and_date(
    State(state): State<AppState>,
    Query(query): Query<ByDateQuery>,
) -> Result<Json<ShiftOverview>, ApiError> {
    Ok(Json(
        state
            .manager
            .get_by_cashier_and_date(&query.cashier_id, query.date)
            .await?,
    ))
}

/// GET /shifts/by-branch/{branch_id}
async fn list_by_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> Result<Json<Vec<ShiftSession>>, ApiError> {
    Ok(Json(state.manager.list_by_branch(&branch_id).await?))
}

/// GET /shifts/by-cashier/{cashier_id}
async fn list_by_cashier(
    State(state): State<AppState>,
    Path(cashier_id): Path<String>,
) -> Result<Json<Vec<ShiftSession>>, ApiError> {
    Ok(Json(state.manager.list_by_cashier(&cashier_id).await?))
}

/// GET /shifts
async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<ShiftSession>>, ApiError> {
    Ok(Json(state.manager.list_all().await?))
}
