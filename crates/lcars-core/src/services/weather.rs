//! Open-Meteo weather: geocode the city, then fetch current conditions and a 7-day forecast.

use super::{http_client, read_json};
use crate::error::{LcarsError, LcarsResult};
use crate::traits::{CurrentWeather, WeatherSource};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEOCODING_BASE: &str = "https://geocoding-api.open-meteo.com/v1";
const FORECAST_BASE: &str = "https://api.open-meteo.com/v1";
const FORECAST_DAYS: usize = 7;
/// Open-Meteo reports no visibility; the dashboard shows a fixed 10 km.
const DEFAULT_VISIBILITY_M: u32 = 10_000;

/// Maps a WMO weather code to a display condition.
pub fn condition_for_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        c if c < 0 => "Unknown",
        1..=3 => "Partly cloudy",
        4..=48 => "Foggy",
        49..=67 => "Rainy",
        68..=77 => "Snowy",
        78..=82 => "Rain showers",
        83..=86 => "Snow showers",
        87..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub day: String,
    pub date: String,
    pub condition: String,
    pub max_temp: f64,
    pub min_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temp: f64,
    pub feels_like: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub visibility: u32,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherReport {
    /// Rounded summary used by the dashboard header and the composer.
    pub fn current(&self) -> CurrentWeather {
        CurrentWeather {
            temp: self.temp.round() as i32,
            condition: self.condition.clone(),
            city: self.city.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    current: CurrentBlock,
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i64>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

fn weekday_label(date: &str) -> String {
    let label = match NaiveDate::parse_from_str(date, "%Y-%m-%d").map(|d| d.weekday()) {
        Ok(Weekday::Sun) => "Sun",
        Ok(Weekday::Mon) => "Mon",
        Ok(Weekday::Tue) => "Tue",
        Ok(Weekday::Wed) => "Wed",
        Ok(Weekday::Thu) => "Thu",
        Ok(Weekday::Fri) => "Fri",
        Ok(Weekday::Sat) => "Sat",
        Err(_) => "",
    };
    label.to_string()
}

impl ForecastResponse {
    pub(crate) fn into_report(self, city: String) -> WeatherReport {
        let d = &self.daily;
        let days = [
            d.time.len(),
            d.weather_code.len(),
            d.temperature_2m_max.len(),
            d.temperature_2m_min.len(),
            FORECAST_DAYS,
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        let forecast = (0..days)
            .map(|i| DailyForecast {
                day: weekday_label(&d.time[i]),
                date: d.time[i].clone(),
                condition: condition_for_code(d.weather_code[i]).to_string(),
                max_temp: d.temperature_2m_max[i],
                min_temp: d.temperature_2m_min[i],
            })
            .collect();
        let c = &self.current;
        WeatherReport {
            city,
            temp: c.temperature_2m,
            feels_like: c.apparent_temperature,
            condition: condition_for_code(c.weather_code).to_string(),
            humidity: c.relative_humidity_2m,
            wind_speed: c.wind_speed_10m,
            wind_direction: c.wind_direction_10m,
            visibility: DEFAULT_VISIBILITY_M,
            forecast,
        }
    }
}

/// Open-Meteo client. No API key required.
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    geocoding_base: String,
    forecast_base: String,
}

impl WeatherClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            geocoding_base: GEOCODING_BASE.to_string(),
            forecast_base: FORECAST_BASE.to_string(),
        }
    }

    pub fn with_base_urls(mut self, geocoding: &str, forecast: &str) -> Self {
        self.geocoding_base = geocoding.trim_end_matches('/').to_string();
        self.forecast_base = forecast.trim_end_matches('/').to_string();
        self
    }

    /// Full report for `city`: current conditions plus the 7-day forecast.
    pub async fn report(&self, city: &str) -> LcarsResult<WeatherReport> {
        let res = self
            .client
            .get(format!("{}/search", self.geocoding_base))
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?;
        let geo: GeoResponse = read_json("Weather", res).await?;
        let place = geo
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LcarsError::upstream("Weather", format!("City not found: {}", city)))?;

        let res = self
            .client
            .get(format!("{}/forecast", self.forecast_base))
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,wind_direction_10m".to_string(),
                ),
                ("daily", "weather_code,temperature_2m_max,temperature_2m_min".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await?;
        let forecast: ForecastResponse = read_json("Weather", res).await?;
        tracing::debug!(target: "lcars::weather", city = %place.name, "weather fetched");
        Ok(forecast.into_report(place.name))
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current(&self, city: &str) -> LcarsResult<CurrentWeather> {
        Ok(self.report(city).await?.current())
    }
}
