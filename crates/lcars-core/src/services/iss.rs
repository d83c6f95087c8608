//! ISS position from the open-notify feed.

use super::{http_client, read_json};
use crate::error::{LcarsError, LcarsResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ISS_BASE: &str = "http://api.open-notify.org";
/// Nominal orbital altitude; the feed does not report one.
pub const ISS_ALTITUDE_KM: u32 = 408;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
    pub altitude: u32,
}

#[derive(Debug, Deserialize)]
struct IssNow {
    timestamp: i64,
    iss_position: RawPosition,
}

// The feed sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct RawPosition {
    latitude: String,
    longitude: String,
}

impl IssNow {
    fn into_position(self) -> LcarsResult<IssPosition> {
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| LcarsError::upstream("ISS", format!("bad coordinate: {}", v)))
        };
        Ok(IssPosition {
            latitude: parse(&self.iss_position.latitude)?,
            longitude: parse(&self.iss_position.longitude)?,
            timestamp: self.timestamp,
            altitude: ISS_ALTITUDE_KM,
        })
    }
}

#[derive(Clone)]
pub struct IssClient {
    client: reqwest::Client,
    base: String,
}

impl IssClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base: ISS_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base: &str) -> Self {
        self.base = base.trim_end_matches('/').to_string();
        self
    }

    pub async fn location(&self) -> LcarsResult<IssPosition> {
        let res = self
            .client
            .get(format!("{}/iss-now.json", self.base))
            .send()
            .await?;
        let raw: IssNow = read_json("ISS", res).await?;
        raw.into_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_coordinates_are_parsed() {
        let json = r#"{"message":"success","timestamp":1700000000,
            "iss_position":{"latitude":"-12.3456","longitude":"101.5"}}"#;
        let pos = serde_json::from_str::<IssNow>(json)
            .unwrap()
            .into_position()
            .unwrap();
        assert_eq!(pos.latitude, -12.3456);
        assert_eq!(pos.longitude, 101.5);
        assert_eq!(pos.altitude, 408);
    }

    #[test]
    fn garbage_coordinate_is_upstream_error() {
        let json = r#"{"timestamp":1,"iss_position":{"latitude":"north","longitude":"0"}}"#;
        let err = serde_json::from_str::<IssNow>(json)
            .unwrap()
            .into_position()
            .unwrap_err();
        assert!(matches!(err, LcarsError::Upstream { service: "ISS", .. }));
    }
}
