//! # Staff Directory Repository
//!
//! Cashier and branch lookups, implementing the
//! `tally_shift::StaffDirectory` contract. Staff CRUD itself belongs to
//! the user-management subsystem; this repository only resolves ids and
//! provides insert helpers for seeding and tests.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{Branch, Cashier, StaffRole};
use tally_shift::{StaffDirectory, StoreResult};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CashierRow {
    id: String,
    name: String,
    role: StaffRole,
    branch_id: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct BranchRow {
    id: String,
    name: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for staff/branch lookups.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Inserts a branch. Seed/test helper.
    pub async fn insert_branch(&self, branch: &Branch) -> DbResult<()> {
        debug!(branch_id = %branch.id, "Inserting branch");

        sqlx::query("INSERT INTO branches (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&branch.id)
            .bind(&branch.name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Inserts a staff member. Seed/test helper.
    pub async fn insert_cashier(&self, cashier: &Cashier) -> DbResult<()> {
        debug!(cashier_id = %cashier.id, "Inserting staff member");

        sqlx::query(
            "INSERT INTO staff (id, name, role, branch_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&cashier.id)
        .bind(&cashier.name)
        .bind(cashier.role)
        .bind(&cashier.branch_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks a cashier up by id, failing with NotFound.
    ///
    /// Convenience over the trait's `Option` contract for callers that
    /// require the cashier to exist.
    pub async fn require_cashier(&self, id: &str) -> DbResult<Cashier> {
        match self.cashier(id).await {
            Ok(Some(cashier)) => Ok(cashier),
            Ok(None) => Err(DbError::not_found("Cashier", id)),
            Err(e) => Err(DbError::Internal(e.to_string())),
        }
    }
}

#[async_trait]
impl StaffDirectory for StaffRepository {
    async fn cashier(&self, id: &str) -> StoreResult<Option<Cashier>> {
        let row: Option<CashierRow> =
            sqlx::query_as("SELECT id, name, role, branch_id FROM staff WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        Ok(row.map(|r| Cashier {
            id: r.id,
            name: r.name,
            role: r.role,
            branch_id: r.branch_id,
        }))
    }

    async fn branch(&self, id: &str) -> StoreResult<Option<Branch>> {
        let row: Option<BranchRow> =
            sqlx::query_as("SELECT id, name FROM branches WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;

        Ok(row.map(|r| Branch {
            id: r.id,
            name: r.name,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
