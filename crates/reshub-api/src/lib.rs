//! # reshub-api
//!
//! HTTP API layer for ResHub built on Axum.
//!
//! Exposes the reservation manager as REST endpoints under `/api`, with the
//! caller identity taken from a proxy-supplied request header.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
