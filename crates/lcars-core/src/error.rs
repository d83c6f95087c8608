//! Error types for the LCARS Console core.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for console operations.
pub type LcarsResult<T> = Result<T, LcarsError>;

/// Errors raised by stores, collaborator clients and configuration loading.
#[derive(Error, Debug)]
pub enum LcarsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("{service} error: {message}")]
    Upstream { service: &'static str, message: String },

    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("Rate limit reached. Try again in {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl LcarsError {
    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        LcarsError::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Classifies the error for the UI (toast text and retry hint).
    pub fn info(&self) -> ErrorInfo {
        let kind = match self {
            LcarsError::Validation(_) => ErrorKind::Validation,
            LcarsError::RateLimited(_) => ErrorKind::RateLimit,
            LcarsError::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            LcarsError::Http(e) if e.is_connect() || e.is_request() => ErrorKind::Network,
            LcarsError::Http(_) | LcarsError::Upstream { .. } => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        };
        let user_message = match kind {
            ErrorKind::Timeout => "Request timed out. Please try again.".to_string(),
            ErrorKind::Network => "Network error. Please check your connection.".to_string(),
            ErrorKind::Server => "Server error. Please try again later.".to_string(),
            _ => self.to_string(),
        };
        ErrorInfo {
            message: self.to_string(),
            kind,
            user_message,
            retryable: kind.retryable(),
        }
    }
}

/// Coarse error category shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    RateLimit,
    Timeout,
    Server,
    Unknown,
}

impl ErrorKind {
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Network | ErrorKind::RateLimit | ErrorKind::Timeout | ErrorKind::Server
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub user_message: String,
    pub retryable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_not_retryable() {
        let info = LcarsError::Validation("Message cannot be empty".into()).info();
        assert_eq!(info.kind, ErrorKind::Validation);
        assert!(!info.retryable);
        assert!(info.user_message.contains("Message cannot be empty"));
    }

    #[test]
    fn upstream_maps_to_server() {
        let info = LcarsError::upstream("NASA", "HTTP 503").info();
        assert_eq!(info.kind, ErrorKind::Server);
        assert!(info.retryable);
        assert_eq!(info.user_message, "Server error. Please try again later.");
    }

    #[test]
    fn not_found_message() {
        let err = LcarsError::NotFound { kind: "Task", id: 7 };
        assert_eq!(err.to_string(), "Task 7 not found");
    }
}
