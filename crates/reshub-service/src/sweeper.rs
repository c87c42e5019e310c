//! Background expiry sweeper.
//!
//! Every operation already sweeps lazily; this loop additionally keeps the
//! snapshot file free of stale entries while the server is idle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

use reshub_core::config::ReservationConfig;

use crate::manager::ReservationManager;

/// Periodically removes expired reservations until shutdown is signalled.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Manager whose snapshot is swept.
    manager: Arc<ReservationManager>,
    /// Delay between sweeps.
    interval: Duration,
}

impl ExpirySweeper {
    /// Create a sweeper running every `interval`.
    pub fn new(manager: Arc<ReservationManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Create a sweeper from configuration; `None` when the interval is 0.
    pub fn from_config(
        manager: Arc<ReservationManager>,
        config: &ReservationConfig,
    ) -> Option<Self> {
        match config.sweep_interval_seconds {
            0 => None,
            secs => Some(Self::new(manager, Duration::from_secs(secs))),
        }
    }

    /// Run sweeps until the cancel signal flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            "Expiry sweeper started with interval={}s",
            self.interval.as_secs()
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // The first tick completes immediately; the manager already swept on load.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Expiry sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.manager.sweep_expired().await {
                        Ok(0) => tracing::trace!("Expiry sweep found nothing to remove"),
                        Ok(removed) => {
                            tracing::debug!("Expiry sweep removed {} reservation(s)", removed)
                        }
                        Err(e) => tracing::error!("Expiry sweep failed: {}", e),
                    }
                }
            }
        }

        tracing::info!("Expiry sweeper shut down complete");
    }

    /// Spawn the sweep loop onto the runtime.
    pub fn spawn(self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }
}
