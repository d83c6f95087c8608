//! Collaborator seams used by the response composer.
//!
//! The gateway wires the in-memory [`Console`](crate::store::Console), the Open-Meteo
//! client and the Anthropic client behind these traits; tests swap in fakes.

use crate::error::LcarsResult;
use crate::store::{NewTask, Task};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Every task, newest first.
    async fn list(&self) -> LcarsResult<Vec<Task>>;

    async fn create(&self, task: NewTask) -> LcarsResult<Task>;
}

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temp: i32,
    pub condition: String,
    pub city: String,
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> LcarsResult<CurrentWeather>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No API key; the caller answers locally.
    #[error("chat backend not configured")]
    NotConfigured,

    #[error("chat backend failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ChatError>;

    fn is_configured(&self) -> bool {
        true
    }
}

/// Chat backend with no key: every call reports `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl ChatBackend for Unconfigured {
    async fn send(&self, _message: &str) -> Result<String, ChatError> {
        Err(ChatError::NotConfigured)
    }

    fn is_configured(&self) -> bool {
        false
    }
}
