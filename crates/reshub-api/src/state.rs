//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use reshub_core::config::AppConfig;
use reshub_service::ReservationManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The single reservation state manager
    pub manager: Arc<ReservationManager>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Bundles configuration and the manager, stamping the start time.
    pub fn new(config: Arc<AppConfig>, manager: Arc<ReservationManager>) -> Self {
        Self {
            config,
            manager,
            started_at: Instant::now(),
        }
    }
}
