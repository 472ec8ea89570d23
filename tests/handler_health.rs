mod common;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use axum_test::TestServer;
use std::sync::Arc;
use tinylink::api::handlers::health_handler;
use tinylink::infrastructure::persistence::FileLinkStore;
use tinylink::state::AppState;

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

#[tokio::test]
async fn test_health_reports_ok_with_backend() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::create_test_state(&dir).await;
    let server = TestServer::new(app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "file");
    assert!(json["version"].is_string());
    assert_eq!(json["store"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_store_is_broken() {
    let dir = tempfile::tempdir().unwrap();

    // A regular file where the store expects a parent directory makes
    // init fail without touching anything else.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let store = FileLinkStore::new(blocker.join("sub").join("links.json"));
    let state = AppState::new(Arc::new(store), false);
    let server = TestServer::new(app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store"]["status"], "error");
    assert!(json["store"]["message"].is_string());
}
