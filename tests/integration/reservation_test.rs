//! Reservation lifecycle integration tests over the HTTP API.

mod helpers;

use std::sync::Arc;

use chrono::Duration;
use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, local};
use reshub_core::clock::ManualClock;
use reshub_service::{Catalog, ExpiryPolicy, ReservationManager};
use reshub_storage::JsonFileStore;

#[tokio::test]
async fn test_list_shows_all_resources_available() {
    let app = TestApp::new().await;

    let resources = app.list("alice").await;
    let ids: Vec<&str> = resources.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["desk-1", "desk-2", "room-a"]);
    assert!(resources.iter().all(|r| r["available"] == true));
    assert_eq!(resources[0]["meta"]["floor"], 3);
    assert!(resources[0]["reservation"].is_null());
}

#[tokio::test]
async fn test_reserve_defaults_to_midnight_and_persists() {
    let app = TestApp::new().await;

    let response = app.reserve("desk-1", "alice", None).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["user"], "alice");
    assert_eq!(response.body["data"]["reserved_at"], "2026-03-02T09:00:00+09:00");
    assert_eq!(response.body["data"]["expires_at"], "2026-03-03T00:00:00+09:00");

    let state = app.state_file().expect("state file written");
    assert_eq!(state["reservations"]["desk-1"]["user"], "alice");
    assert_eq!(
        state["reservations"]["desk-1"]["expires_at"],
        "2026-03-03T00:00:00+09:00"
    );
}

#[tokio::test]
async fn test_reserve_with_deadline() {
    let app = TestApp::new().await;

    let response = app.reserve("room-a", "alice", Some("17:30")).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["expires_at"], "2026-03-02T17:30:00+09:00");

    // Already past today, so it rolls to tomorrow.
    let response = app.reserve("desk-2", "alice", Some("08:00")).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["data"]["expires_at"], "2026-03-03T08:00:00+09:00");
}

#[tokio::test]
async fn test_list_marks_callers_reservations() {
    let app = TestApp::new().await;
    app.reserve("desk-1", "alice", None).await;

    let as_alice = app.list("alice").await;
    assert_eq!(as_alice[0]["available"], false);
    assert_eq!(as_alice[0]["reservation"]["user"], "alice");
    assert_eq!(as_alice[0]["reservation"]["held_by_caller"], true);

    let as_bob = app.list("bob").await;
    assert_eq!(as_bob[0]["reservation"]["held_by_caller"], false);
    assert_eq!(as_bob[1]["available"], true);
}

#[tokio::test]
async fn test_double_reserve_conflicts() {
    let app = TestApp::new().await;
    app.reserve("desk-1", "alice", Some("12:00")).await;
    let before = app.state_file();

    let response = app.reserve("desk-1", "bob", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "ALREADY_RESERVED");

    let response = app.reserve("desk-1", "alice", None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    assert_eq!(app.state_file(), before);
}

#[tokio::test]
async fn test_invalid_deadline_rejected() {
    let app = TestApp::new().await;

    for until in ["25:00", "noon", "12:5", "1200"] {
        let response = app.reserve("desk-1", "alice", Some(until)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "until={until}");
        assert_eq!(response.body["error"], "INVALID_DEADLINE");
    }

    assert!(app.state_file().is_none());
    assert_eq!(app.list("alice").await[0]["available"], true);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/resources/desk-1/reservation",
            Some(json!({ "until": 1730 })),
            Some("alice"),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_resource_rejected() {
    let app = TestApp::new().await;

    let response = app.reserve("desk-99", "alice", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "UNKNOWN_RESOURCE");
}

#[tokio::test]
async fn test_missing_identity_rejected() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/resources", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNKNOWN_IDENTITY");

    let response = app
        .request("POST", "/api/resources/desk-1/reservation", None, Some("   "))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.state_file().is_none());
}

#[tokio::test]
async fn test_release_rules() {
    let app = TestApp::new().await;
    app.reserve("desk-1", "alice", None).await;

    let response = app.release("desk-1", "bob").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "NOT_OWNER");
    assert_eq!(app.list("bob").await[0]["reservation"]["user"], "alice");

    let response = app.release("desk-1", "alice").await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.list("alice").await[0]["available"], true);

    let response = app.release("desk-1", "alice").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_RESERVED");
}

#[tokio::test]
async fn test_expired_reservation_frees_resource() {
    let app = TestApp::new().await;
    app.reserve("desk-1", "alice", Some("12:00")).await;

    app.clock.set(local(11, 59));
    assert_eq!(app.list("bob").await[0]["available"], false);

    app.clock.set(local(12, 0));
    assert_eq!(app.list("bob").await[0]["available"], true);
    let state = app.state_file().expect("state file written");
    assert!(state["reservations"]["desk-1"].is_null());

    let response = app.reserve("desk-1", "bob", None).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app.release("desk-1", "alice").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_release_after_expiry_is_not_reserved() {
    let app = TestApp::at(local(23, 0)).await;
    app.reserve("desk-2", "alice", None).await;

    app.clock.advance(Duration::hours(1));
    let response = app.release("desk-2", "alice").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let app = TestApp::new().await;
    app.reserve("desk-1", "alice", Some("18:00")).await;
    app.reserve("room-a", "bob", None).await;

    let catalog = Catalog::from_json(
        br#"[{"id":"desk-1","name":"Desk 1"},{"id":"room-a","name":"Room A"}]"#,
    )
    .unwrap();
    let restarted = ReservationManager::new(
        Arc::new(catalog),
        Arc::new(JsonFileStore::new(&app.config.reservations.state_file)),
        Arc::new(ManualClock::new(local(10, 0))),
        ExpiryPolicy::new(helpers::tz()),
    );

    let views = restarted.list_resources("alice").await.unwrap();
    assert_eq!(views[0].reservation.as_ref().unwrap().user, "alice");
    assert!(views[0].reservation.as_ref().unwrap().held_by_caller);
    assert_eq!(views[1].reservation.as_ref().unwrap().user, "bob");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reserves_grant_one() {
    let app = TestApp::new().await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let router = app.router.clone();
        tasks.push(tokio::spawn(async move {
            use tower::ServiceExt;
            let req = http::Request::builder()
                .method("POST")
                .uri("/api/resources/desk-1/reservation")
                .header(helpers::IDENTITY_HEADER, format!("user-{i}"))
                .body(axum::body::Body::empty())
                .unwrap();
            router.oneshot(req).await.unwrap().status()
        }));
    }

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(created, 1);

    let state = app.state_file().expect("state file written");
    assert_eq!(state["reservations"].as_object().unwrap().len(), 1);
}
