use std::fmt::Display;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

/// Error half of JSON handlers: status plus `{success:false, error}`.
pub type ApiError = (StatusCode, Json<Value>);

pub fn fail(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(json!({ "success": false, "error": msg.into() })))
}

pub fn internal<E: Display>(e: E) -> ApiError {
    error!(error = %e, "request failed");
    fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
