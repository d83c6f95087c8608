//! HTTP clients for the third-party feeds behind the console.
//!
//! Each client owns a `reqwest::Client` with a bounded timeout and a configurable base
//! URL, and turns the provider's JSON into a typed record at the boundary.

pub mod chat;
pub mod iss;
pub mod nasa;
pub mod routing;
pub mod weather;

pub use chat::ChatClient;
pub use iss::{IssClient, IssPosition};
pub use nasa::{Apod, NasaClient};
pub use routing::{format_distance, format_duration, RouteSummary, RoutingClient};
pub use weather::{condition_for_code, DailyForecast, WeatherClient, WeatherReport};

use crate::error::{LcarsError, LcarsResult};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared client builder: every outbound call is bounded by `timeout`.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Reads the body and decodes it, mapping non-2xx statuses to an upstream error.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    res: reqwest::Response,
) -> LcarsResult<T> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        tracing::warn!(target: "lcars::services", service, status = status.as_u16(), "upstream returned error status");
        return Err(LcarsError::upstream(service, format!("HTTP {}", status.as_u16())));
    }
    Ok(serde_json::from_str(&text)?)
}
