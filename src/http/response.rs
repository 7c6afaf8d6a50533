//! JSON error bodies shared by every rejection the gateway produces.
//!
//! Bodies carry a stable `error` code string and a human-readable
//! `message`; nothing from upstream responses or credentials is echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// `{ "error": ..., "message": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody::new(error, message))).into_response()
}

/// 404 for a missing record.
pub fn not_found(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found", message)
}

/// 500 with a fixed message; the cause is logged by the caller.
pub fn internal_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", message)
}
