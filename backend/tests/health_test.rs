//! Readiness and liveness over the full router

mod common;

use axum::http::StatusCode;
use common::parse;
use wiremock::MockServer;

#[tokio::test]
async fn test_ready_when_food_database_answers() {
    // An empty mock server answers 404 to everything, which still counts as up
    let server = MockServer::start().await;
    let app = common::TestApp::with_lookup(&server.uri());

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    let report = parse(&body);
    assert_eq!(report["status"], "ready");
    assert_eq!(report["checks"]["store"]["state"], "ok");
    assert_eq!(report["checks"]["food_database"]["state"], "ok");
    assert!(report["checks"]["store"].get("message").is_none());
}

#[tokio::test]
async fn test_degraded_without_food_database() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/ready").await;

    // Manual logging still works, so the service stays ready
    assert_eq!(status, StatusCode::OK);
    let report = parse(&body);
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["checks"]["store"]["state"], "ok");
    assert_eq!(report["checks"]["food_database"]["state"], "degraded");
    assert!(report["checks"]["food_database"]["message"]
        .as_str()
        .unwrap()
        .contains("Open Food Facts"));
}

#[tokio::test]
async fn test_liveness_and_version() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/health/live").await;
    assert_eq!(status, StatusCode::OK);
    let report = parse(&body);
    assert_eq!(report["status"], "alive");
    assert_eq!(report["version"], env!("CARGO_PKG_VERSION"));
    assert!(report.get("checks").is_none());
}

#[tokio::test]
async fn test_api_root() {
    let app = common::TestApp::new();

    let (status, body) = app.get("/api/v1/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Macro Tracker API v1");
}
