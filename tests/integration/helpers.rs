//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use reshub_api::{AppState, build_app};
use reshub_core::clock::ManualClock;
use reshub_core::config::AppConfig;
use reshub_entity::ResourceDescriptor;
use reshub_service::{Catalog, ExpiryPolicy, ReservationManager};
use reshub_storage::JsonFileStore;

/// Identity header used by the test configuration
pub const IDENTITY_HEADER: &str = "x-remote-user";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Manager behind the router
    pub manager: Arc<ReservationManager>,
    /// Clock driving expiry
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
    /// Holds the state file; dropped with the app
    pub data_dir: TempDir,
}

/// The test timezone, +09:00.
pub fn tz() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid offset")
}

/// 2026-03-02 `hour:minute` in the test timezone.
pub fn local(hour: u32, minute: u32) -> DateTime<Utc> {
    tz().with_ymd_and_hms(2026, 3, 2, hour, minute, 0)
        .single()
        .expect("valid local time")
        .with_timezone(&Utc)
}

impl TestApp {
    /// Create a test application at 09:00 local time
    pub async fn new() -> Self {
        Self::at(local(9, 0)).await
    }

    /// Create a test application whose clock starts at `now`
    pub async fn at(now: DateTime<Utc>) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.reservations.state_file = data_dir
            .path()
            .join("reservations.json")
            .display()
            .to_string();
        config.reservations.timezone = "+09:00".to_string();
        config.auth.identity_header = IDENTITY_HEADER.to_string();

        let catalog = Catalog::new(vec![
            ResourceDescriptor::new("desk-1", "Desk 1").with_meta("floor", 3),
            ResourceDescriptor::new("desk-2", "Desk 2"),
            ResourceDescriptor::new("room-a", "Meeting Room A").with_meta("capacity", 8),
        ])
        .expect("Failed to build catalog");

        let store = JsonFileStore::open(&config.reservations.state_file)
            .await
            .expect("Failed to open state file");
        let clock = Arc::new(ManualClock::new(now));

        let manager = Arc::new(
            ReservationManager::new(
                Arc::new(catalog),
                Arc::new(store),
                clock.clone(),
                ExpiryPolicy::new(tz()),
            )
            .with_known_resource_check(config.reservations.require_known_resource),
        );

        let state = AppState::new(Arc::new(config.clone()), Arc::clone(&manager));
        let router = build_app(state, &config.server.cors);

        Self {
            router,
            manager,
            clock,
            config,
            data_dir,
        }
    }

    /// Raw contents of the state file, if it exists
    pub fn state_file(&self) -> Option<Value> {
        let bytes = std::fs::read(&self.config.reservations.state_file).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(user) = user {
            req = req.header(IDENTITY_HEADER, user);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Reserve as `user`, optionally with a deadline
    pub async fn reserve(&self, id: &str, user: &str, until: Option<&str>) -> TestResponse {
        let body = until.map(|u| serde_json::json!({ "until": u }));
        self.request("POST", &format!("/api/resources/{id}/reservation"), body, Some(user))
            .await
    }

    /// Release as `user`
    pub async fn release(&self, id: &str, user: &str) -> TestResponse {
        self.request("DELETE", &format!("/api/resources/{id}/reservation"), None, Some(user))
            .await
    }

    /// List resources as `user`, returning the `data` array
    pub async fn list(&self, user: &str) -> Vec<Value> {
        let response = self.request("GET", "/api/resources", None, Some(user)).await;
        assert_eq!(response.status, StatusCode::OK, "List failed: {:?}", response.body);
        response.body["data"]
            .as_array()
            .cloned()
            .expect("data is an array")
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
