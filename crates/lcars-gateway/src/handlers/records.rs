use super::body;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use lcars_core::store::{
    AnalyticsStats, CalendarEvent, NewCalendarEvent, NewNotification, NewTask, NewTravelRoute,
    Notification, Settings, SettingsPatch, Task, TaskStats, TravelRoute,
};
use lcars_core::LcarsError;
use serde_json::{json, Value};
use std::sync::Arc;

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

fn found<T>(result: Result<T, LcarsError>, missing: &str) -> ApiResult<Json<T>> {
    match result {
        Ok(row) => Ok(Json(row)),
        Err(LcarsError::NotFound { .. }) => Err(ApiError::not_found(missing)),
        Err(e) => Err(e.into()),
    }
}

fn deleted(ok: bool, missing: &str) -> ApiResult<Json<Value>> {
    if ok {
        Ok(success())
    } else {
        Err(ApiError::not_found(missing))
    }
}

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.console.tasks())
}

pub async fn task_stats(State(state): State<Arc<AppState>>) -> Json<TaskStats> {
    Json(state.console.task_stats())
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let new = body(payload, "Invalid task data")?;
    state
        .console
        .create_task(new)
        .map(Json)
        .map_err(|_| ApiError::bad_request("Invalid task data"))
}

pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Task>> {
    found(state.console.complete_task(id), "Task not found")
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    deleted(state.console.delete_task(id), "Task not found")
}

pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<CalendarEvent>> {
    Json(state.console.events())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCalendarEvent>, JsonRejection>,
) -> ApiResult<Json<CalendarEvent>> {
    let new = body(payload, "Invalid event data")?;
    state
        .console
        .create_event(new)
        .map(Json)
        .map_err(|_| ApiError::bad_request("Invalid event data"))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    deleted(state.console.delete_event(id), "Event not found")
}

pub async fn list_notifications(State(state): State<Arc<AppState>>) -> Json<Vec<Notification>> {
    Json(state.console.notifications())
}

pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewNotification>, JsonRejection>,
) -> ApiResult<Json<Notification>> {
    let new = body(payload, "Invalid notification data")?;
    state
        .console
        .create_notification(new)
        .map(Json)
        .map_err(|_| ApiError::bad_request("Invalid notification data"))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Notification>> {
    found(state.console.mark_notification_read(id), "Notification not found")
}

pub async fn mark_all_read(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.console.mark_all_notifications_read();
    success()
}

pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    deleted(state.console.delete_notification(id), "Notification not found")
}

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.console.settings())
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SettingsPatch>, JsonRejection>,
) -> ApiResult<Json<Settings>> {
    let patch = body(payload, "Invalid settings data")?;
    Ok(Json(state.console.update_settings(patch)))
}

pub async fn analytics_stats(State(state): State<Arc<AppState>>) -> Json<AnalyticsStats> {
    Json(state.console.analytics_stats())
}

pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<Vec<TravelRoute>> {
    Json(state.console.routes())
}

pub async fn save_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTravelRoute>, JsonRejection>,
) -> ApiResult<Json<TravelRoute>> {
    let new = body(payload, "Invalid route data")?;
    state
        .console
        .save_route(new)
        .map(Json)
        .map_err(|_| ApiError::bad_request("Invalid route data"))
}

pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    deleted(state.console.delete_route(id), "Route not found")
}
