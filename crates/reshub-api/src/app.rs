//! Application builder: wires router, middleware, and state into an Axum app.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use reshub_core::clock::SystemClock;
use reshub_core::config::{AppConfig, CorsConfig};
use reshub_core::error::AppError;
use reshub_service::{Catalog, ExpirySweeper, ReservationManager};
use reshub_storage::JsonFileStore;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(build_cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
}

/// Runs the ResHub server until Ctrl+C (or SIGTERM on Unix).
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ResHub server...");

    // ── Step 1: Catalog ──────────────────────────────────────────
    let catalog = Arc::new(Catalog::load(&config.reservations.catalog_file).await?);

    // ── Step 2: Snapshot store ───────────────────────────────────
    let store = Arc::new(JsonFileStore::open(&config.reservations.state_file).await?);
    tracing::info!(
        "Reservation state stored at '{}'",
        config.reservations.state_file
    );

    // ── Step 3: Reservation manager ──────────────────────────────
    let manager = Arc::new(ReservationManager::from_config(
        &config.reservations,
        catalog,
        store,
        Arc::new(SystemClock),
    )?);
    tracing::info!(
        "Deadlines evaluated in timezone {} (now {})",
        manager.policy().timezone(),
        manager.local_now()
    );

    // Surface a corrupt or unreadable snapshot before accepting traffic.
    let expired = manager.sweep_expired().await?;
    if expired > 0 {
        tracing::info!("Removed {} reservation(s) that expired while offline", expired);
    }

    // ── Step 4: Shutdown channel & sweeper ───────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = match ExpirySweeper::from_config(Arc::clone(&manager), &config.reservations)
    {
        Some(sweeper) => Some(sweeper.spawn(shutdown_rx.clone())),
        None => {
            tracing::info!("Background expiry sweeper disabled");
            None
        }
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(Arc::new(config.clone()), manager);
    let app = build_app(state, &config.server.cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("ResHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(handle) = sweeper_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Expiry sweeper did not stop within {}s", grace.as_secs());
        }
    }

    tracing::info!("ResHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
