//! JSON error responses: `{ "error": "..." }` with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lcars_core::LcarsError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Logs `err` and hides it behind `message`.
    pub fn internal(message: impl Into<String>, err: &LcarsError) -> Self {
        let message = message.into();
        tracing::warn!(target: "lcars::gateway", error = %err, "{}", message);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<LcarsError> for ApiError {
    fn from(err: LcarsError) -> Self {
        let status = match &err {
            LcarsError::Validation(_) => StatusCode::BAD_REQUEST,
            LcarsError::NotFound { .. } => StatusCode::NOT_FOUND,
            LcarsError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(target: "lcars::gateway", error = %err, "request failed");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
