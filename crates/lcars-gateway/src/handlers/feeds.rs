//! Proxies for the third-party feeds: weather, APOD, ISS and routing.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lcars_core::services::{Apod, IssPosition, WeatherReport};
use lcars_core::store::TravelMode;
use lcars_core::{LcarsError, WeatherSource};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    city: Option<String>,
}

pub async fn weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CityQuery>,
) -> ApiResult<Json<WeatherReport>> {
    let city = query
        .city
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.config.default_city.clone());
    state
        .weather
        .report(&city)
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch weather data", &e))
}

/// Current conditions for the settings city. Failures still carry the widget shape.
pub async fn current_weather(State(state): State<Arc<AppState>>) -> Response {
    match state.weather.current(&state.city()).await {
        Ok(current) => Json(current).into_response(),
        Err(e) => {
            tracing::warn!(target: "lcars::gateway", error = %e, "current weather unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "temp": "--", "condition": "Loading...", "city": "Unknown" })),
            )
                .into_response()
        }
    }
}

pub async fn apod(State(state): State<Arc<AppState>>) -> ApiResult<Json<Apod>> {
    state
        .nasa
        .apod()
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch NASA APOD", &e))
}

pub async fn iss_location(State(state): State<Arc<AppState>>) -> ApiResult<Json<IssPosition>> {
    state
        .iss
        .location()
        .await
        .map(Json)
        .map_err(|e| ApiError::internal("Failed to fetch ISS location", &e))
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    origin: Option<String>,
    destination: Option<String>,
    mode: Option<String>,
}

pub async fn travel_route(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RouteQuery>,
) -> ApiResult<Response> {
    let (origin, destination) = match (query.origin, query.destination) {
        (Some(o), Some(d)) if !o.trim().is_empty() && !d.trim().is_empty() => (o, d),
        _ => return Err(ApiError::bad_request("Origin and destination are required")),
    };
    let mode = query.mode.as_deref().map(TravelMode::parse).unwrap_or_default();

    match state.routing.route(&origin, &destination, mode).await {
        Ok(summary) => Ok(Json(json!({
            "distance": summary.distance,
            "duration": summary.duration,
            "apiAvailable": true,
        }))
        .into_response()),
        Err(LcarsError::NotConfigured(service)) => Ok(Json(json!({
            "distance": "",
            "duration": "",
            "error": format!("{} not configured", service),
            "apiAvailable": false,
            "message": "Add TOMTOM_API_KEY to .env to enable route calculation. See API-ALTERNATIVES.md for other options.",
        }))
        .into_response()),
        Err(e) => Err(ApiError::internal("Failed to calculate route", &e)),
    }
}
