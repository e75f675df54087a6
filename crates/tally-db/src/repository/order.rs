//! # Order/Refund Fact Repository
//!
//! Read access to the order and refund tables for shift reconciliation,
//! implementing the `tally_shift::SalesFeed` contract.
//!
//! Facts come back flat: an order plus its line-item snapshots, no joins
//! to a live product catalog. Both window queries are half-open
//! `[start, end)` on `created_at`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{OrderFact, OrderLine, PaymentMethod, RefundFact};
use tally_shift::{SalesFeed, StoreResult};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    total_cents: Option<i64>,
    payment_method: Option<PaymentMethod>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    order_id: String,
    product_id: Option<String>,
    product_name: String,
    quantity: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct RefundRow {
    id: String,
    amount_cents: Option<i64>,
    payment_method: Option<PaymentMethod>,
    reason: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl From<RefundRow> for RefundFact {
    fn from(row: RefundRow) -> Self {
        RefundFact {
            id: row.id,
            amount_cents: row.amount_cents,
            payment_method: row.payment_method,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order/refund fact queries.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order fact with its line items.
    ///
    /// Used by the seed binary and tests; production orders are written
    /// by the order subsystem.
    pub async fn insert_order(
        &self,
        cashier_id: &str,
        branch_id: Option<&str>,
        order: &OrderFact,
    ) -> DbResult<()> {
        debug!(order_id = %order.id, cashier_id = %cashier_id, "Inserting order fact");

        sqlx::query(
            r#"
            INSERT INTO orders (id, cashier_id, branch_id, total_cents, payment_method, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(cashier_id)
        .bind(branch_id)
        .bind(order.total_cents)
        .bind(order.payment_method)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        for line in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order.id)
            .bind(&line.product_id)
            .bind(&line.product_name)
            .bind(line.quantity)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Inserts a refund fact.
    pub async fn insert_refund(&self, cashier_id: &str, refund: &RefundFact) -> DbResult<()> {
        debug!(refund_id = %refund.id, cashier_id = %cashier_id, "Inserting refund fact");

        sqlx::query(
            r#"
            INSERT INTO refunds (id, cashier_id, amount_cents, payment_method, reason, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&refund.id)
        .bind(cashier_id)
        .bind(refund.amount_cents)
        .bind(refund.payment_method)
        .bind(&refund.reason)
        .bind(refund.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SalesFeed for OrderRepository {
    async fn orders_for_cashier_in_window(
        &self,
        cashier_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<OrderFact>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, total_cents, payment_method, created_at
            FROM orders
            WHERE cashier_id = ?1 AND created_at >= ?2 AND created_at < ?3
            ORDER BY created_at
            "#,
        )
        .bind(cashier_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        let line_rows: Vec<OrderLineRow> = sqlx::query_as(
            r#"
            SELECT oi.order_id, oi.product_id, oi.product_name, oi.quantity
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.cashier_id = ?1 AND o.created_at >= ?2 AND o.created_at < ?3
            ORDER BY oi.rowid
            "#,
        )
        .bind(cashier_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        let mut lines_by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            lines_by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderLine {
                    product_id: row.product_id,
                    product_name: row.product_name,
                    quantity: row.quantity,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = lines_by_order.remove(&row.id).unwrap_or_default();
                OrderFact {
                    id: row.id,
                    total_cents: row.total_cents,
                    payment_method: row.payment_method,
                    created_at: row.created_at,
                    items,
                }
            })
            .collect())
    }

    async fn refunds_for_cashier_in_window(
        &self,
        cashier_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<RefundFact>> {
        let rows: Vec<RefundRow> = sqlx::query_as(
            r#"
            SELECT id, amount_cents, payment_method, reason, created_at
            FROM refunds
            WHERE cashier_id = ?1 AND created_at >= ?2 AND created_at < ?3
            ORDER BY created_at
            "#,
        )
        .bind(cashier_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(rows.into_iter().map(RefundFact::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
