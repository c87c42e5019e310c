//! Health endpoint integration tests.

mod helpers;

use http::StatusCode;

use helpers::TestApp;

#[tokio::test]
async fn test_health_needs_no_identity() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["resources"], 3);
}

#[tokio::test]
async fn test_health_reports_server_time_in_configured_zone() {
    let app = TestApp::at(helpers::local(16, 45)).await;

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["server_time"], "2026-03-02T16:45:00+09:00");

    app.clock.advance(chrono::Duration::minutes(30));
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.body["data"]["server_time"], "2026-03-02T17:15:00+09:00");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/desks", None, Some("alice")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
