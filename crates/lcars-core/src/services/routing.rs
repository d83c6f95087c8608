//! TomTom routing: geocode both ends and summarize the first route.

use super::{http_client, read_json};
use crate::error::{LcarsError, LcarsResult};
use crate::store::TravelMode;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOMTOM_BASE: &str = "https://api.tomtom.com";
const MILES_PER_KM: f64 = 0.621371;

/// "12.3 km (7.6 mi)"
pub fn format_distance(meters: f64) -> String {
    let km = meters / 1000.0;
    format!("{:.1} km ({:.1} mi)", km, km * MILES_PER_KM)
}

/// "2h 5m", or "45m" under an hour.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

fn tomtom_mode(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Driving => "car",
        TravelMode::Walking => "pedestrian",
        TravelMode::Transit => "bus",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance: String,
    pub duration: String,
    pub length_in_meters: f64,
    pub travel_time_in_seconds: u64,
}

impl RouteSummary {
    pub fn new(length_in_meters: f64, travel_time_in_seconds: u64) -> Self {
        Self {
            distance: format_distance(length_in_meters),
            duration: format_duration(travel_time_in_seconds),
            length_in_meters,
            travel_time_in_seconds,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    position: Position,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Position {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Route {
    summary: RawSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSummary {
    length_in_meters: f64,
    travel_time_in_seconds: u64,
}

#[derive(Clone)]
pub struct RoutingClient {
    client: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

impl RoutingClient {
    /// `api_key` of `None` leaves the client unconfigured; every call then fails with
    /// `NotConfigured`.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base: TOMTOM_BASE.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> LcarsResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(LcarsError::NotConfigured("TomTom Maps"))
    }

    async fn geocode(&self, address: &str) -> LcarsResult<Position> {
        let key = self.key()?;
        let mut url = Url::parse(&self.base)
            .map_err(|e| LcarsError::upstream("TomTom", format!("bad base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| LcarsError::upstream("TomTom", "base url cannot hold a path"))?
            .pop_if_empty()
            .extend(["search", "2", "geocode"])
            .push(&format!("{}.json", address));
        let res = self.client.get(url).query(&[("key", key)]).send().await?;
        let body: GeocodeResponse = read_json("TomTom", res).await?;
        body.results
            .first()
            .map(|r| r.position)
            .ok_or_else(|| LcarsError::upstream("TomTom", format!("Could not geocode: {}", address)))
    }

    /// Distance and travel time between two free-text addresses.
    pub async fn route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> LcarsResult<RouteSummary> {
        let key = self.key()?;
        let from = self.geocode(origin).await?;
        let to = self.geocode(destination).await?;
        let url = format!(
            "{}/routing/1/calculateRoute/{},{}:{},{}/json",
            self.base, from.lat, from.lon, to.lat, to.lon
        );
        let res = self
            .client
            .get(url)
            .query(&[("key", key), ("travelMode", tomtom_mode(mode))])
            .send()
            .await?;
        let body: RouteResponse = read_json("TomTom", res).await?;
        let summary = body
            .routes
            .into_iter()
            .next()
            .map(|r| r.summary)
            .ok_or_else(|| LcarsError::upstream("TomTom", "No route found"))?;
        tracing::debug!(target: "lcars::routing", origin, destination, "route calculated");
        Ok(RouteSummary::new(
            summary.length_in_meters,
            summary.travel_time_in_seconds,
        ))
    }
}
