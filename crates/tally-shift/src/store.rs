//! # Storage Contracts
//!
//! The traits the shift engine needs from its collaborators. Implemented
//! for SQLite in `tally-db`; tests use in-memory fakes.
//!
//! All windows are half-open `[start, end)`: a fact created exactly at
//! `end` belongs to the next window.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use tally_core::{Branch, Cashier, OrderFact, RefundFact, ShiftSession};

// =============================================================================
// Store Error
// =============================================================================

/// Errors surfaced by storage collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness guarantee rejected the write. For shift sessions this
    /// means another open session already exists for the cashier - the
    /// caller should re-read and adopt the winner instead of failing.
    #[error("Conflicting write: {0}")]
    Conflict(String),

    /// Any other backend failure (connection, query, decode).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Shift Store
// =============================================================================

/// Persistence contract for shift sessions.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Inserts or updates a session and returns the persisted row.
    ///
    /// Inserting a second open session for the same cashier must fail
    /// with [`StoreError::Conflict`].
    async fn save(&self, session: ShiftSession) -> StoreResult<ShiftSession>;

    /// Looks a session up by id.
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ShiftSession>>;

    /// The cashier's open session (`shift_end IS NULL`), most recent by
    /// `shift_start` if the invariant was ever violated upstream.
    async fn find_open_for_cashier(&self, cashier_id: &str) -> StoreResult<Option<ShiftSession>>;

    /// A session whose `shift_start` falls within `[day_start, day_end)`.
    async fn find_for_cashier_on_day(
        &self,
        cashier_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> StoreResult<Option<ShiftSession>>;

    /// All sessions worked at a branch.
    async fn find_by_branch(&self, branch_id: &str) -> StoreResult<Vec<ShiftSession>>;

    /// All sessions for a cashier.
    async fn find_by_cashier(&self, cashier_id: &str) -> StoreResult<Vec<ShiftSession>>;

    /// Every session.
    async fn find_all(&self) -> StoreResult<Vec<ShiftSession>>;
}

// =============================================================================
// Sales Feed
// =============================================================================

/// Read-only access to the order/refund subsystem.
///
/// The feed returns flat fact lists; the engine never walks a live entity
/// graph.
#[async_trait]
pub trait SalesFeed: Send + Sync {
    /// Orders attributed to the cashier, created within `[start, end)`.
    async fn orders_for_cashier_in_window(
        &self,
        cashier_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<OrderFact>>;

    /// Refunds attributed to the cashier, created within `[start, end)`.
    async fn refunds_for_cashier_in_window(
        &self,
        cashier_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<RefundFact>>;
}

// =============================================================================
// Staff Directory
// =============================================================================

/// Lookup of cashiers and branches.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn cashier(&self, id: &str) -> StoreResult<Option<Cashier>>;

    async fn branch(&self, id: &str) -> StoreResult<Option<Branch>>;
}
