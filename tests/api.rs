//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use task_timer::{
    clock::MonotonicClock,
    history::{FileStore, HistoryStore},
    timer::TimerSettings,
    AppState, CountdownTimer,
};
use tower::ServiceExt;

fn build_app(data_dir: &std::path::Path) -> (Router, Arc<AppState>) {
    let store = FileStore::new(data_dir).unwrap();
    let history = Arc::new(Mutex::new(HistoryStore::open(store)));
    let timer = CountdownTimer::new(
        TimerSettings::default(),
        Arc::new(MonotonicClock::anchored_at(1_700_000_000_000)),
        Arc::clone(&history),
    );
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), timer, history));
    (task_timer::create_router(Arc::clone(&state)), state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test(start_paused = true)]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build_app(dir.path());
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn start_then_complete_shows_up_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = build_app(dir.path());

    let (status, body) = call(
        &app,
        Method::POST,
        "/timer/start",
        Some(r#"{"task":"write report"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["timer"]["task"], "write report");
    assert_eq!(body["timer"]["display"], "0:05");

    tokio::time::sleep(Duration::from_millis(5_500)).await;

    let (_, body) = call(&app, Method::GET, "/timer/status", None).await;
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["display"], "0:00");
    assert_eq!(body["history_count"], 1);
    assert_eq!(body["last_action"], "start");

    let (_, body) = call(&app, Method::GET, "/history", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["task"], "write report");
    assert_eq!(body["entries"][0]["startedAt"], 1_700_000_000_000i64);
    assert!(body["lines"][0].as_str().unwrap().ends_with(" write report"));

    // The file on disk holds the same array
    let raw = std::fs::read_to_string(dir.path().join("history.json")).unwrap();
    assert_eq!(raw, r#"[{"task":"write report","startedAt":1700000000000}]"#);
}

#[tokio::test(start_paused = true)]
async fn start_without_body_uses_empty_task() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_app(dir.path());

    let (status, body) = call(&app, Method::POST, "/timer/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["task"], "");

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(state.history_snapshot()[0].task, "");
}

#[tokio::test(start_paused = true)]
async fn malformed_start_body_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_app(dir.path());

    let (status, _) = call(&app, Method::POST, "/timer/start", Some(r#"{"task":"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/timer/start", Some(r#"{"task":42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(!state.timer.status().is_running());
    assert!(!state.timer.has_tick_task());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(state.history_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn stop_resets_display_and_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = build_app(dir.path());

    call(&app, Method::POST, "/timer/start", Some(r#"{"task":"x"}"#)).await;
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    let (status, body) = call(&app, Method::POST, "/timer/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["display"], "0:05");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(state.history_len(), 0);
    assert!(!dir.path().join("history.json").exists());
}

#[tokio::test(start_paused = true)]
async fn clear_then_reload_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("history.json"),
        r#"[{"task":"a","startedAt":1},{"task":"b","startedAt":2}]"#,
    )
    .unwrap();
    let (app, _) = build_app(dir.path());

    let (_, body) = call(&app, Method::GET, "/history", None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][1]["task"], "b");

    let (status, body) = call(&app, Method::DELETE, "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(!dir.path().join("history.json").exists());

    let (_, body) = call(&app, Method::POST, "/history/reload", None).await;
    assert_eq!(body["count"], 0);

    // A fresh session over the same directory starts empty too
    let (fresh, _) = build_app(dir.path());
    let (_, body) = call(&fresh, Method::GET, "/history", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test(start_paused = true)]
async fn corrupt_history_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("history.json"), "not json at all").unwrap();
    let (app, _) = build_app(dir.path());

    let (status, body) = call(&app, Method::GET, "/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}
