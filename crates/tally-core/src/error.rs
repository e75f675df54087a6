//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── CoreError        - Domain lookup and state errors                 │
//! │                                                                         │
//! │  tally-shift errors (separate crate)                                   │
//! │  ├── StoreError       - Storage contract failures                      │
//! │  └── ShiftError       - Lifecycle orchestration failures               │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What clients see (serialized)                  │
//! │                                                                         │
//! │  Flow: CoreError → ShiftError → ApiError → Client                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (cashier id, shift id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// Every variant is an expected, recoverable-by-caller condition. None of
/// them abort the process; they propagate unmodified to the API boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Cashier id did not resolve against the staff directory.
    #[error("Cashier not found: {0}")]
    CashierNotFound(String),

    /// An explicitly supplied branch id did not resolve.
    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    /// Shift session id did not resolve.
    #[error("Shift session not found: {0}")]
    ShiftNotFound(String),

    /// `end` was called with no shift id and no open session to fall
    /// back on.
    #[error("No active shift found for cashier {0}")]
    NoActiveShift(String),

    /// A new session needs a branch, but neither the request nor the
    /// cashier record carries one.
    #[error("No branch determinable for cashier {0}")]
    NoBranch(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CashierNotFound("c-42".to_string());
        assert_eq!(err.to_string(), "Cashier not found: c-42");

        let err = CoreError::NoActiveShift("c-42".to_string());
        assert_eq!(err.to_string(), "No active shift found for cashier c-42");

        let err = CoreError::NoBranch("c-42".to_string());
        assert_eq!(err.to_string(), "No branch determinable for cashier c-42");
    }
}
