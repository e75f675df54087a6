//! # Engine Error Types
//!
//! Error type for shift lifecycle operations.
//!
//! ## Taxonomy
//! ```text
//! NotFound    - shift / cashier / branch absent (CoreError::*NotFound)
//! InvalidState- end called with nothing to close (CoreError::NoActiveShift)
//! Validation  - no branch determinable (CoreError::NoBranch)
//! Store       - backend failures, including write conflicts
//! ```
//!
//! Every variant is recoverable by the caller and propagates to the API
//! boundary unmodified - the engine never swallows an error and never
//! panics.

use thiserror::Error;

use crate::store::StoreError;
use tally_core::CoreError;

/// Shift lifecycle errors.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// Domain condition: lookups that came up empty or state that does
    /// not admit the operation.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Storage collaborator failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for shift lifecycle operations.
pub type ShiftResult<T> = Result<T, ShiftError>;
