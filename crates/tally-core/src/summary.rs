//! # Sales Summary Aggregation
//!
//! Turns a window of order and refund facts into a [`SalesSummary`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     summarize(orders, refunds)                          │
//! │                                                                         │
//! │   orders ──┬──► totals        Σ total_cents, count                      │
//! │            ├──► breakdown     group by payment method → pct of gross    │
//! │            ├──► top products  Σ quantity per product, top 5             │
//! │            └──► recent        sort by created_at desc, first 10         │
//! │                                                                         │
//! │   refunds ────► totals        Σ amount_cents                            │
//! │                                                                         │
//! │   net = sales − refunds   (may be negative, never clamped)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure computation: no I/O, deterministic for a given input ordering.
//! Degenerate input never errors - missing amounts count as zero, missing
//! payment tags bucket as cash, and line items without a product reference
//! are skipped by the ranking.

use std::collections::HashMap;

use crate::money::Money;
use crate::types::{OrderFact, PaymentMethod, PaymentSummary, ProductSales, RefundFact, SalesSummary};
use crate::{RECENT_ORDERS_LIMIT, TOP_PRODUCTS_LIMIT};

// =============================================================================
// Entry Point
// =============================================================================

/// Summarizes one aggregation window.
///
/// ## Guarantees
/// - `net_sales == total_sales - total_refunds`, exactly (integer cents).
/// - Percentages are all 0.0 when gross sales are zero; otherwise they sum
///   to 100 up to rounding.
/// - Breakdown list order is not contractual.
/// - Top-product ties keep their first-encountered order (stable sort).
/// - Empty input yields [`SalesSummary::empty`].
pub fn summarize(orders: &[OrderFact], refunds: &[RefundFact]) -> SalesSummary {
    let total_sales: Money = orders.iter().map(OrderFact::total).sum();
    let total_refunds: Money = refunds.iter().map(RefundFact::amount).sum();
    let net_sales = total_sales - total_refunds;

    SalesSummary {
        total_sales_cents: total_sales.cents(),
        total_refunds_cents: total_refunds.cents(),
        net_sales_cents: net_sales.cents(),
        total_orders: orders.len() as i64,
        payment_summaries: payment_breakdown(orders, total_sales),
        top_products: top_products(orders),
        recent_orders: recent_orders(orders),
    }
}

// =============================================================================
// Payment Breakdown
// =============================================================================

/// Groups orders by payment method and computes each method's share of
/// gross sales.
fn payment_breakdown(orders: &[OrderFact], total_sales: Money) -> Vec<PaymentSummary> {
    let mut grouped: HashMap<PaymentMethod, (Money, i64)> = HashMap::new();

    for order in orders {
        let method = order.payment_method.unwrap_or_default();
        let slot = grouped.entry(method).or_insert((Money::zero(), 0));
        slot.0 += order.total();
        slot.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(method, (amount, count))| PaymentSummary {
            method,
            total_cents: amount.cents(),
            transaction_count: count,
            // Guard the zero-sales window: 0.0, never NaN or infinity.
            percentage: if total_sales.is_zero() {
                0.0
            } else {
                amount.cents() as f64 * 100.0 / total_sales.cents() as f64
            },
        })
        .collect()
}

// =============================================================================
// Top Products
// =============================================================================

/// Accumulates quantity sold per distinct product and ranks descending.
///
/// Accumulation preserves first-encounter order so that the stable sort
/// leaves tied products in input order. Lines without a product reference
/// are excluded from the ranking.
fn top_products(orders: &[OrderFact]) -> Vec<ProductSales> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<ProductSales> = Vec::new();

    for order in orders {
        for line in &order.items {
            let Some(product_id) = line.product_id.as_deref() else {
                continue;
            };
            match index.get(product_id) {
                Some(&i) => ranked[i].quantity_sold += line.quantity,
                None => {
                    index.insert(product_id, ranked.len());
                    ranked.push(ProductSales {
                        product_id: product_id.to_string(),
                        product_name: line.product_name.clone(),
                        quantity_sold: line.quantity,
                    });
                }
            }
        }
    }

    ranked.sort_by(|a, b| b.quantity_sold.cmp(&a.quantity_sold));
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    ranked
}

// =============================================================================
// Recent Orders
// =============================================================================

/// Most-recent-first orders, bounded. Orders with no creation time sort
/// as oldest.
fn recent_orders(orders: &[OrderFact]) -> Vec<OrderFact> {
    let mut recent = orders.to_vec();
    // Option<DateTime> ordering puts None first, so reverse comparison
    // sorts None (unknown age) to the tail.
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_ORDERS_LIMIT);
    recent
}

// =============================================================================
// Unit Tests
// =============================================================================
