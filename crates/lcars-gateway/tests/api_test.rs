//! Router tests driven through `tower::ServiceExt::oneshot`. No keys are configured,
//! so nothing here leaves the process.
//!
//! Run with: `cargo test -p lcars-gateway --test api_test`

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use lcars_core::{Console, LcarsConfig, Unconfigured};
use lcars_gateway::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(console: Arc<Console>) -> Router {
    let mut config = LcarsConfig::load_from(None).unwrap();
    config.anthropic_api_key = None;
    config.tomtom_api_key = None;
    build_router(Arc::new(AppState::with_parts(config, console, Arc::new(Unconfigured))))
}

fn app() -> Router {
    app_with(Arc::new(Console::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn task_lifecycle() {
    let app = app();
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({ "title": "Scan the nebula", "dueDate": "2024-05-04T10:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], 1);
    assert_eq!(created["priority"], "medium");
    assert_eq!(created["status"], "active");

    let (status, done) = send(&app, Method::PATCH, "/api/tasks/1/complete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert!(done["completedAt"].is_string());

    let (_, stats) = send(&app, Method::GET, "/api/tasks/stats", None).await;
    assert_eq!(stats["completedTasks"], 1);
    assert_eq!(stats["productivityScore"], 100);

    let (status, body) = send(&app, Method::DELETE, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = send(&app, Method::DELETE, "/api/tasks/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn invalid_task_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/tasks", Some(json!({ "title": "no due date" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid task data");

    let (status, _) = send(&app, Method::PATCH, "/api/tasks/42/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notifications_mark_all_read() {
    let app = app_with(Arc::new(Console::seeded()));
    send(
        &app,
        Method::POST,
        "/api/notifications",
        Some(json!({ "title": "Red alert", "message": "Shields up", "type": "warning" })),
    )
    .await;

    let (_, list) = send(&app, Method::GET, "/api/notifications", None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["title"], "Red alert");

    let (status, _) = send(&app, Method::POST, "/api/notifications/mark-all-read", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, Method::GET, "/api/notifications", None).await;
    assert!(list.as_array().unwrap().iter().all(|n| n["read"] == true));
}

#[tokio::test]
async fn settings_merge() {
    let app = app();
    let (status, settings) = send(
        &app,
        Method::PUT,
        "/api/settings",
        Some(json!({ "defaultCity": "San Francisco", "soundEffects": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["defaultCity"], "San Francisco");
    assert_eq!(settings["soundEffects"], false);
    assert_eq!(settings["theme"], "dark");
}

#[tokio::test]
async fn panel_layouts() {
    let app = app();
    let (_, grid) = send(&app, Method::GET, "/api/panels?panels=weather,calendar,weather", None).await;
    assert_eq!(grid["state"], "grid");
    assert_eq!(grid["columns"], 2);
    assert_eq!(grid["panels"].as_array().unwrap().len(), 2);

    let (_, invalid) = send(&app, Method::GET, "/api/panels?panels=holodeck", None).await;
    assert_eq!(invalid["state"], "invalid_panels");

    let (_, empty) = send(&app, Method::GET, "/api/panels", None).await;
    assert_eq!(empty["state"], "no_panels");
}

#[tokio::test]
async fn command_creates_task() {
    let console = Arc::new(Console::seeded());
    let app = app_with(console.clone());
    let (status, reply) = send(
        &app,
        Method::POST,
        "/api/assistant/command",
        Some(json!({ "message": "add task Calibrate sensors" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["intent"]["kind"], "create_task");
    assert!(reply["route"].is_null());
    assert_eq!(console.tasks()[0].title, "Calibrate sensors");
    assert_eq!(console.conversations().len(), 1);
    assert_eq!(console.analytics_stats().commands_executed, 1);
}

#[tokio::test]
async fn command_navigation_and_multiview() {
    let app = app();
    let (_, nav) = send(&app, Method::POST, "/api/assistant/command", Some(json!({ "message": "open calendar" }))).await;
    assert_eq!(nav["intent"]["kind"], "navigate");
    assert_eq!(nav["route"], "/calendar");

    let (_, multi) = send(
        &app,
        Method::POST,
        "/api/assistant/command",
        Some(json!({ "message": "show weather and calendar" })),
    )
    .await;
    assert_eq!(multi["route"], "/multiview?panels=weather,calendar");
}

#[tokio::test]
async fn captain_command_stages_terminal() {
    let app = app();
    let (_, reply) = send(
        &app,
        Method::POST,
        "/api/assistant/command",
        Some(json!({ "message": "what would picard say" })),
    )
    .await;
    assert_eq!(reply["route"], "/terminal");

    let (_, staged) = send(&app, Method::GET, "/api/terminal/staged", None).await;
    assert_eq!(staged["command"], "picard");
    let (_, staged) = send(&app, Method::GET, "/api/terminal/staged", None).await;
    assert!(staged["command"].is_null());
}

#[tokio::test]
async fn command_rejects_empty_and_script() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/assistant/command", Some(json!({ "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assistant/command",
        Some(json!({ "message": "<script>alert(1)</script>" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_chat_without_key() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/ai/chat", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");

    let (status, body) = send(&app, Method::POST, "/api/ai/chat", Some(json!({ "message": "hi" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["apiAvailable"], false);
    assert_eq!(body["error"], "Claude AI not configured");
}

#[tokio::test]
async fn assistant_chat_answers_locally() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assistant/chat",
        Some(json!({ "message": "what about an african swallow" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "local");
    assert!(body["response"].as_str().unwrap().starts_with("🐦 SWALLOW ANALYSIS"));
}

#[tokio::test]
async fn sentiment_scores_text() {
    let app = app();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/assistant/sentiment",
        Some(json!({ "text": "this is great, excellent work" })),
    )
    .await;
    assert_eq!(body["mood"], "positive");
}

#[tokio::test]
async fn terminal_runs_commands() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/terminal", Some(json!({ "command": "echo engage" }))).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = body["lines"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["text"].as_str())
        .collect();
    assert_eq!(texts.first().copied(), Some("> echo engage"));
    assert!(texts.contains(&"engage"));

    let (_, cleared) = send(&app, Method::POST, "/api/terminal", Some(json!({ "command": "clear" }))).await;
    assert_eq!(cleared["clear"], true);
}

#[tokio::test]
async fn travel_route_guards() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/travel/route?origin=Paris", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Origin and destination are required");
}

#[tokio::test]
async fn rate_limit_status() {
    let app = app();
    let (_, body) = send(&app, Method::GET, "/api/ai/rate-limit", None).await;
    assert_eq!(body["remaining"], 5);
    assert_eq!(body["message"], "5/5 requests available");
}

#[tokio::test]
async fn ai_chat_rejects_unsafe_input() {
    let console = Arc::new(Console::new());
    let app = app_with(console.clone());
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ai/chat",
        Some(json!({ "message": "<script>alert(1)</script>" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let long = "a".repeat(5_000);
    let (status, _) = send(&app, Method::POST, "/api/ai/chat", Some(json!({ "message": long }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(console.conversations().is_empty());
}

#[tokio::test]
async fn terminal_guards_calc_input() {
    let app = app();
    let huge = format!("calc {}", "(".repeat(100_000));
    let (status, _) = send(&app, Method::POST, "/api/terminal", Some(json!({ "command": huge }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let nested = format!("calc {}1", "-".repeat(900));
    let (status, body) = send(&app, Method::POST, "/api/terminal", Some(json!({ "command": nested }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"][1]["text"], "❌ Invalid expression");
}
