//! # Domain Types
//!
//! Core domain types used throughout Tally POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ShiftSession   │   │   OrderFact     │   │   RefundFact    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  cashier_id     │   │  total_cents    │   │  amount_cents   │       │
//! │  │  shift_start    │   │  payment_method │   │  payment_method │       │
//! │  │  shift_end?     │   │  items[]        │   │  reason         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SalesSummary   │   │ PaymentSummary  │   │  PaymentMethod  │       │
//! │  │  (computed,     │   │  per-method     │   │  Cash           │       │
//! │  │   never stored) │   │  totals + pct   │   │  Card           │       │
//! │  └─────────────────┘   └─────────────────┘   │  DigitalWallet  │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fact Types
//! `OrderFact` and `RefundFact` are flat value objects referenced by id.
//! The aggregator consumes fact lists rather than walking a live entity
//! graph, so there is no lazy-loading and no cyclic ownership. Fields that
//! the upstream subsystems may leave unset are `Option` and degrade to
//! zero/default during aggregation instead of failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Payment Method
// =============================================================================

/// How an order or refund was paid.
///
/// Closed set; orders arriving without a tag are bucketed as `Cash`.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment (terminal or stored card).
    Card,
    /// Wallet/QR payment apps.
    DigitalWallet,
}

// =============================================================================
// Staff Directory
// =============================================================================

/// Staff role, condensed to the roles the shift engine cares about.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    StoreManager,
    BranchManager,
    Cashier,
}

/// A cashier as resolved from the staff directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cashier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Role within the store.
    pub role: StaffRole,

    /// Branch this cashier is assigned to, if any. Used as the fallback
    /// when "start shift" is called without an explicit branch.
    pub branch_id: Option<String>,
}

/// A branch of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Order / Refund Facts
// =============================================================================

/// A line item within an order fact.
///
/// `product_name` is a snapshot frozen at sale time; the aggregator never
/// resolves products against a live catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Product reference. A line with no resolvable product is excluded
    /// from the top-products ranking but still counts toward order totals.
    pub product_id: Option<String>,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Quantity sold.
    pub quantity: i64,
}

/// A read-only order record for a bounded aggregation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFact {
    pub id: String,

    /// Order total in cents. Missing amounts aggregate as zero.
    pub total_cents: Option<i64>,

    /// Payment tag. Missing tags bucket as [`PaymentMethod::Cash`].
    pub payment_method: Option<PaymentMethod>,

    /// Creation time. Orders with no timestamp sort as oldest in the
    /// recent-orders window.
    pub created_at: Option<DateTime<Utc>>,

    /// Line items.
    pub items: Vec<OrderLine>,
}

impl OrderFact {
    /// Returns the order total as Money (missing → zero).
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents.unwrap_or(0))
    }
}

/// A read-only refund record for a bounded aggregation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundFact {
    pub id: String,

    /// Refund amount in cents. Missing amounts aggregate as zero.
    pub amount_cents: Option<i64>,

    /// Payment tag of the refunded transaction.
    pub payment_method: Option<PaymentMethod>,

    /// Free-form reason captured at refund time.
    pub reason: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
}

impl RefundFact {
    /// Returns the refund amount as Money (missing → zero).
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents.unwrap_or(0))
    }
}

// =============================================================================
// Shift Session
// =============================================================================

/// A cashier's bounded work session.
///
/// ## Lifecycle
/// ```text
/// NOT_STARTED ──start──► OPEN (shift_end = None)
///                          │
///                         end
///                          ▼
///                        CLOSED (shift_end = Some, totals fixed)
///                          │
///                         end (re-close: recompute over stored window)
///                          ▼
///                        CLOSED
/// ```
///
/// ## Invariants
/// - At most one session per cashier has `shift_end = None` at any time.
/// - At most one session per cashier per calendar day is created by
///   "start"; repeat starts return the existing session.
///
/// Totals are zero until the session is closed; only "end" writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSession {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The cashier who owns this session.
    pub cashier_id: String,

    /// The branch the shift was worked at.
    pub branch_id: String,

    /// When the shift opened.
    pub shift_start: DateTime<Utc>,

    /// When the shift closed. `None` means the shift is still open.
    pub shift_end: Option<DateTime<Utc>>,

    /// Gross sales over the shift window, fixed at close.
    pub total_sales_cents: i64,

    /// Total refunds over the shift window, fixed at close.
    pub total_refunds_cents: i64,

    /// total_sales − total_refunds. May be negative; never clamped.
    pub net_sales_cents: i64,

    /// Number of orders in the shift window, fixed at close.
    pub total_orders: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShiftSession {
    /// Whether the shift is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.shift_end.is_none()
    }

    /// Gross sales as Money.
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }

    /// Net sales as Money.
    #[inline]
    pub fn net_sales(&self) -> Money {
        Money::from_cents(self.net_sales_cents)
    }
}

// =============================================================================
// Sales Summary (computed, never persisted)
// =============================================================================

/// Per-payment-method slice of a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub method: PaymentMethod,

    /// Sum of order totals paid with this method.
    pub total_cents: i64,

    /// Number of orders paid with this method.
    pub transaction_count: i64,

    /// Share of gross sales, 0..=100. Exactly 0.0 when gross sales are
    /// zero (never NaN or infinity). Display only.
    pub percentage: f64,
}

/// Aggregated quantity sold for one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub product_id: String,
    pub product_name: String,
    pub quantity_sold: i64,
}

/// The computed reconciliation of a shift window.
///
/// Pure value object: derived per request from order/refund facts and
/// never written back to storage. Every field is always present - empty
/// input yields zeros and empty lists, never nulls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales_cents: i64,
    pub total_refunds_cents: i64,
    pub net_sales_cents: i64,
    pub total_orders: i64,

    /// Per-method breakdown. List order is not contractual.
    pub payment_summaries: Vec<PaymentSummary>,

    /// Top products by accumulated quantity, at most
    /// [`TOP_PRODUCTS_LIMIT`](crate::TOP_PRODUCTS_LIMIT) entries.
    pub top_products: Vec<ProductSales>,

    /// Most-recent-first orders, at most
    /// [`RECENT_ORDERS_LIMIT`](crate::RECENT_ORDERS_LIMIT) entries.
    pub recent_orders: Vec<OrderFact>,
}

impl SalesSummary {
    /// The all-zero summary: what "no active shift" and empty windows
    /// render as, so callers never special-case absence.
    pub fn empty() -> Self {
        SalesSummary {
            total_sales_cents: 0,
            total_refunds_cents: 0,
            net_sales_cents: 0,
            total_orders: 0,
            payment_summaries: Vec::new(),
            top_products: Vec::new(),
            recent_orders: Vec::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
