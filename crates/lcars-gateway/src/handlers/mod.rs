//! Route handlers, grouped by what they front.

pub mod assistant;
pub mod feeds;
pub mod records;

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;

/// Unwraps a JSON body, answering 400 with `message` when it does not parse.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>, message: &str) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!(target: "lcars::gateway", %rejection, "rejected body");
            Err(ApiError::bad_request(message))
        }
    }
}
