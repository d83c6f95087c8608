//! Console configuration: defaults, optional TOML file, then `LCARS__*` environment.

use crate::error::LcarsResult;
use crate::guard::message_limits;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const PLACEHOLDER_KEYS: &[&str] = &["your_anthropic_api_key_here", "your_tomtom_api_key_here"];

#[derive(Debug, Clone, Deserialize)]
pub struct LcarsConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    /// City used when settings carry none.
    pub default_city: String,
    pub fetch_timeout_ms: u64,
    /// Calls per minute allowed on the chat endpoints.
    pub chat_rate_limit: usize,
    pub message_max_len: usize,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    #[serde(default)]
    pub tomtom_api_key: Option<String>,
    pub nasa_api_key: String,
}

/// Treats blank values and the `.env.example` placeholders as unset.
fn usable_key(key: Option<&str>) -> Option<String> {
    let key = key?.trim();
    if key.is_empty() || PLACEHOLDER_KEYS.contains(&key) {
        None
    } else {
        Some(key.to_string())
    }
}

impl LcarsConfig {
    /// Loads config. Precedence: `LCARS__*` env > file at `LCARS_CONFIG` (default
    /// `config/lcars.toml`) > defaults.
    pub fn load() -> LcarsResult<Self> {
        let path = std::env::var("LCARS_CONFIG").unwrap_or_else(|_| "config/lcars.toml".to_string());
        Self::load_from(Some(Path::new(&path)))
    }

    pub fn load_from(path: Option<&Path>) -> LcarsResult<Self> {
        let builder = config::Config::builder()
            .set_default("app_name", "LCARS Console")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000_i64)?
            .set_default("default_city", "New York")?
            .set_default("fetch_timeout_ms", crate::guard::timeouts::MEDIUM as i64)?
            .set_default("chat_rate_limit", 5_i64)?
            .set_default("message_max_len", message_limits::LONG as i64)?
            .set_default("anthropic_model", crate::services::chat::DEFAULT_MODEL)?
            .set_default("nasa_api_key", crate::services::nasa::DEMO_KEY)?;

        let builder = match path {
            Some(p) if p.exists() => builder.add_source(config::File::from(p)),
            _ => builder,
        };

        let built = builder
            .add_source(config::Environment::with_prefix("LCARS").separator("__"))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Anthropic key from config, falling back to `ANTHROPIC_API_KEY`.
    pub fn anthropic_key(&self) -> Option<String> {
        usable_key(self.anthropic_api_key.as_deref())
            .or_else(|| usable_key(std::env::var("ANTHROPIC_API_KEY").ok().as_deref()))
    }

    /// TomTom key from config, falling back to `TOMTOM_API_KEY`.
    pub fn tomtom_key(&self) -> Option<String> {
        usable_key(self.tomtom_api_key.as_deref())
            .or_else(|| usable_key(std::env::var("TOMTOM_API_KEY").ok().as_deref()))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
