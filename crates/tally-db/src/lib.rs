//! # tally-db: Database Layer for Tally POS
//!
//! SQLite persistence for the shift backend. Implements the storage
//! contracts defined by `tally-shift` (ShiftStore, SalesFeed,
//! StaffDirectory) on top of a pooled sqlx connection.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (shift, order, staff)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/tally.db");
//! let db = Database::new(config).await?;
//!
//! // Repositories implement the tally-shift contracts
//! let session = db.shifts().find_by_id("…").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::order::OrderRepository;
pub use repository::shift::ShiftRepository;
pub use repository::staff::StaffRepository;
