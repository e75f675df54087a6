//! # Shift Session Repository
//!
//! Database operations for shift sessions, implementing the
//! `tally_shift::ShiftStore` contract.
//!
//! ## Session Lifecycle in the Database
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Shift Session Persistence                              │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── save() inserts row with shift_end = NULL                       │
//! │         (partial unique index: one NULL shift_end per cashier -        │
//! │          a losing concurrent insert fails with Conflict)               │
//! │                                                                         │
//! │  2. CLOSE                                                              │
//! │     └── save() upserts the same row: shift_end set, totals fixed       │
//! │                                                                         │
//! │  3. RE-CLOSE (correction)                                              │
//! │     └── save() overwrites totals again                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbError;
use tally_core::ShiftSession;
use tally_shift::{ShiftStore, StoreResult};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ShiftRow {
    id: String,
    cashier_id: String,
    branch_id: String,
    shift_start: DateTime<Utc>,
    shift_end: Option<DateTime<Utc>>,
    total_sales_cents: i64,
    total_refunds_cents: i64,
    net_sales_cents: i64,
    total_orders: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShiftRow> for ShiftSession {
    fn from(row: ShiftRow) -> Self {
        ShiftSession {
            id: row.id,
            cashier_id: row.cashier_id,
            branch_id: row.branch_id,
            shift_start: row.shift_start,
            shift_end: row.shift_end,
            total_sales_cents: row.total_sales_cents,
            total_refunds_cents: row.total_refunds_cents,
            net_sales_cents: row.net_sales_cents,
            total_orders: row.total_orders,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, cashier_id, branch_id, shift_start, shift_end, \
     total_sales_cents, total_refunds_cents, net_sales_cents, total_orders, \
     created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for shift session database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }
}

#[async_trait]
impl ShiftStore for ShiftRepository {
    /// Inserts or updates a session.
    ///
    /// A second open session for the same cashier violates the partial
    /// unique index and surfaces as `StoreError::Conflict`.
    async fn save(&self, session: ShiftSession) -> StoreResult<ShiftSession> {
        debug!(
            shift_id = %session.id,
            cashier_id = %session.cashier_id,
            open = session.is_open(),
            "Saving shift session"
        );

        sqlx::query(
            r#"
            INSERT INTO shift_sessions (
                id, cashier_id, branch_id, shift_start, shift_end,
                total_sales_cents, total_refunds_cents, net_sales_cents,
                total_orders, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                cashier_id = excluded.cashier_id,
                branch_id = excluded.branch_id,
                shift_start = excluded.shift_start,
                shift_end = excluded.shift_end,
                total_sales_cents = excluded.total_sales_cents,
                total_refunds_cents = excluded.total_refunds_cents,
                net_sales_cents = excluded.net_sales_cents,
                total_orders = excluded.total_orders,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&session.id)
        .bind(&session.cashier_id)
        .bind(&session.branch_id)
        .bind(session.shift_start)
        .bind(session.shift_end)
        .bind(session.total_sales_cents)
        .bind(session.total_refunds_cents)
        .bind(session.net_sales_cents)
        .bind(session.total_orders)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(session)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<ShiftSession>> {
        let row: Option<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(ShiftSession::from))
    }

    async fn find_open_for_cashier(&self, cashier_id: &str) -> StoreResult<Option<ShiftSession>> {
        let row: Option<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions \
             WHERE cashier_id = ?1 AND shift_end IS NULL \
             ORDER BY shift_start DESC LIMIT 1"
        ))
        .bind(cashier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(ShiftSession::from))
    }

    async fn find_for_cashier_on_day(
        &self,
        cashier_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> StoreResult<Option<ShiftSession>> {
        let row: Option<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions \
             WHERE cashier_id = ?1 AND shift_start >= ?2 AND shift_start < ?3 \
             ORDER BY shift_start LIMIT 1"
        ))
        .bind(cashier_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(row.map(ShiftSession::from))
    }

    async fn find_by_branch(&self, branch_id: &str) -> StoreResult<Vec<ShiftSession>> {
        let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions \
             WHERE branch_id = ?1 ORDER BY shift_start DESC"
        ))
        .bind(branch_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(ShiftSession::from).collect())
    }

    async fn find_by_cashier(&self, cashier_id: &str) -> StoreResult<Vec<ShiftSession>> {
        let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions \
             WHERE cashier_id = ?1 ORDER BY shift_start DESC"
        ))
        .bind(cashier_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(ShiftSession::from).collect())
    }

    async fn find_all(&self) -> StoreResult<Vec<ShiftSession>> {
        let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM shift_sessions ORDER BY shift_start DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(ShiftSession::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
