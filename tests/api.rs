use std::{fs, sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use brew_remote::{
    create_router,
    hardware::RecordingOutput,
    state::{AppState, BrewLog},
    Controller, Timings,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(dir: &TempDir) -> (Router, Arc<AppState>) {
    let log = BrewLog::open(dir.path().join("data.csv"));
    let controller = Controller::new(Arc::new(RecordingOutput::new()), log, Timings::default());
    let state = Arc::new(AppState::new(controller, 54773, "127.0.0.1".to_string()));
    (create_router(Arc::clone(&state)), state)
}

/// Send a request via `oneshot` and return (status, location header, body text).
async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8_lossy(&body).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn brew_redirects_to_its_number_then_rejects() {
    let dir = TempDir::new().unwrap();
    let (app, state) = app(&dir);

    let (status, location, _) = send(&app, "GET", "/brew/").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/n1"));

    let (status, location, _) = send(&app, "POST", "/brew").await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/"));

    let (_, _, page) = send(&app, "GET", "/n1").await;
    assert!(page.contains("Brewing coffee number #1"));
    assert!(page.contains("Coffees brewed: 1"));

    state.controller.supervisor().wait_idle().await;
    let (_, location, _) = send(&app, "GET", "/brew/").await;
    assert_eq!(location.as_deref(), Some("/n2"));
}

#[tokio::test(start_paused = true)]
async fn both_locks_out_power_during_boot() {
    let dir = TempDir::new().unwrap();
    let (app, state) = app(&dir);

    let (_, location, _) = send(&app, "GET", "/both/").await;
    assert_eq!(location.as_deref(), Some("/b"));

    tokio::time::sleep(Duration::from_secs(5)).await;
    let (_, location, _) = send(&app, "GET", "/start/").await;
    assert_eq!(location.as_deref(), Some("/"));
    let (_, location, _) = send(&app, "GET", "/both/").await;
    assert_eq!(location.as_deref(), Some("/"));

    let (_, _, page) = send(&app, "GET", "/b").await;
    assert!(page.contains("reject requests for the next 55 Seconds"));

    state.controller.supervisor().wait_idle().await;
    assert_eq!(state.controller.brew_count(), 1);

    let (_, location, _) = send(&app, "GET", "/start").await;
    assert_eq!(location.as_deref(), Some("/s"));
}

#[tokio::test(start_paused = true)]
async fn status_reports_the_holder() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = app(&dir);

    let (_, _, body) = send(&app, "GET", "/status").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["busy"], false);
    assert_eq!(json["brew_count"], 0);

    send(&app, "GET", "/brew/").await;
    let (_, _, body) = send(&app, "GET", "/status").await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["busy"], true);
    assert_eq!(json["busy_with"], "brew-cycle");
    assert_eq!(json["brew_count"], 1);
    assert_eq!(json["last_action"], "brew");
    assert_eq!(json["failed_log_writes"], 0);
}

#[tokio::test(start_paused = true)]
async fn data_export_passes_the_log_through() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = app(&dir);

    let (status, _, _) = send(&app, "GET", "/data/data.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "GET", "/brew/").await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    let (status, _, body) = send(&app, "GET", "/data/data.csv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, fs::read_to_string(dir.path().join("data.csv")).unwrap());
    assert_eq!(body.lines().count(), 1);

    let (status, _, _) = send(&app, "GET", "/data/other.csv").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_home_respond() {
    let dir = TempDir::new().unwrap();
    let (app, _state) = app(&dir);

    let (status, _, body) = send(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ok\""));

    let (status, _, page) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("no status message"));
}
