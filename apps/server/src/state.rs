//! Shared application state.
//!
//! One state type for the whole router; everything inside is cheaply
//! cloneable (Arc or pool-backed).

use std::sync::Arc;

use tally_core::FixedWindowLimiter;
use tally_db::StaffRepository;
use tally_shift::ShiftManager;

use crate::config::ServerConfig;
use crate::identity::JwtManager;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// The shift lifecycle engine.
    pub manager: ShiftManager,

    /// Per-client request counters.
    pub limiter: Arc<FixedWindowLimiter>,

    /// Token signing/validation.
    pub jwt: Arc<JwtManager>,

    /// Staff lookups for token issuance.
    pub staff: StaffRepository,

    /// Loaded configuration.
    pub config: Arc<ServerConfig>,
}
