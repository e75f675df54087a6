//! # Tally POS Backend
//!
//! HTTP server wiring: configuration → database → shift engine → routes.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Server Startup                                   │
//! │                                                                         │
//! │  tracing init ──► config load ──► SQLite pool + migrations             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  repositories ──► ShiftManager ──► rate limiter ──► axum router        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  serve with graceful shutdown (SIGINT/SIGTERM)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod identity;
mod ratelimit;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tally_core::{FixedWindowLimiter, RateLimits};
use tally_db::{Database, DbConfig};
use tally_shift::{SalesFeed, ShiftManager, ShiftStore, StaffDirectory};

use crate::config::ServerConfig;
use crate::identity::JwtManager;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Tally POS backend...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db_path = %config.database_path,
        fallback_cashier = config.fallback_cashier_id.is_some(),
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Connected to SQLite");

    // Build the shift engine over the repository implementations
    let shifts: Arc<dyn ShiftStore> = Arc::new(db.shifts());
    let sales: Arc<dyn SalesFeed> = Arc::new(db.orders());
    let staff_dir: Arc<dyn StaffDirectory> = Arc::new(db.staff());
    let manager = ShiftManager::new(shifts, sales, staff_dir);

    // Rate limiter: strict bucket for /auth, general bucket for the rest
    let limiter = Arc::new(FixedWindowLimiter::new(RateLimits {
        auth_per_minute: config.rate_limit_auth_per_minute,
        general_per_minute: config.rate_limit_general_per_minute,
    }));

    let jwt = Arc::new(JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_lifetime_secs,
    ));

    let state = AppState {
        manager,
        limiter,
        jwt,
        staff: db.staff(),
        config: Arc::new(config.clone()),
    };

    let app = routes::router(state);

    // Start server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
