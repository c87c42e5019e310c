//! Route definitions for the ResHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging and state attached.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(resource_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Resource listing and reservation lifecycle
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(handlers::resource::list_resources))
        .route(
            "/resources/{id}/reservation",
            post(handlers::resource::reserve).delete(handlers::resource::release),
        )
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
