//! NASA Astronomy Picture of the Day.

use super::{http_client, read_json};
use crate::error::LcarsResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const APOD_BASE: &str = "https://api.nasa.gov";
pub const DEMO_KEY: &str = "DEMO_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apod {
    pub title: String,
    pub date: String,
    pub explanation: String,
    pub url: String,
    pub hdurl: Option<String>,
    pub media_type: String,
    pub copyright: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApodResponse {
    title: String,
    date: String,
    #[serde(default)]
    explanation: String,
    url: String,
    hdurl: Option<String>,
    #[serde(default = "default_media_type")]
    media_type: String,
    copyright: Option<String>,
}

fn default_media_type() -> String {
    "image".to_string()
}

impl From<ApodResponse> for Apod {
    fn from(r: ApodResponse) -> Self {
        Apod {
            title: r.title,
            date: r.date,
            explanation: r.explanation,
            url: r.url,
            hdurl: r.hdurl,
            media_type: r.media_type,
            copyright: r.copyright.map(|c| c.trim().to_string()),
        }
    }
}

#[derive(Clone)]
pub struct NasaClient {
    client: reqwest::Client,
    base: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        let key = api_key.trim();
        Self {
            client: http_client(timeout),
            base: APOD_BASE.to_string(),
            api_key: if key.is_empty() { DEMO_KEY } else { key }.to_string(),
        }
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub async fn apod(&self) -> LcarsResult<Apod> {
        let res = self
            .client
            .get(format!("{}/planetary/apod", self.base))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        let raw: ApodResponse = read_json("NASA", res).await?;
        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apod_parses_and_defaults() {
        let json = r#"{"title":"Horsehead","date":"2024-03-01","url":"https://x/y.jpg",
            "explanation":"Dust.","copyright":"\nJane Doe\n"}"#;
        let raw: ApodResponse = serde_json::from_str(json).unwrap();
        let apod: Apod = raw.into();
        assert_eq!(apod.media_type, "image");
        assert_eq!(apod.hdurl, None);
        assert_eq!(apod.copyright.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn blank_key_falls_back_to_demo() {
        let client = NasaClient::new("  ", Duration::from_secs(1));
        assert_eq!(client.api_key, DEMO_KEY);
    }
}
