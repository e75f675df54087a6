//! # tally-core: Pure Business Logic for Tally POS
//!
//! This crate is the **heart** of the Tally POS backend. It contains the
//! shift-reconciliation business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Clients (POS UI)                        │   │
//! │  │    start shift ──► poll progress ──► end shift ──► reports      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (apps/server)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                tally-shift (lifecycle engine)                   │   │
//! │  │    ShiftManager: start, end, current_progress, queries          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  summary  │  │ ratelimit │  │   │
//! │  │   │ OrderFact │  │   Money   │  │ summarize │  │  fixed    │  │   │
//! │  │   │  Session  │  │  (cents)  │  │  (pure)   │  │  window   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ShiftSession, OrderFact, SalesSummary, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`summary`] - The sales aggregator: orders + refunds → SalesSummary
//! - [`ratelimit`] - Fixed-window per-client request limiter
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: `summarize` is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod ratelimit;
pub mod summary;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use ratelimit::{FixedWindowLimiter, RateBucket, RateLimits};
pub use summary::summarize;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of products returned in the top-selling ranking.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Maximum number of orders returned in the recent-orders window.
pub const RECENT_ORDERS_LIMIT: usize = 10;
