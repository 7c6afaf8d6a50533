//! Authorization and rate-limit error types.
//!
//! `VerifyError` records *why* a single credential failed and is only ever
//! logged. Callers see `AuthError`, which deliberately folds every
//! verification cause into one unauthorized response.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::http::response::ErrorBody;

/// Reasons a presented credential failed verification (INVALID_CREDENTIAL).
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Profile service answered with a non-200 status.
    #[error("profile service rejected credential with status {0}")]
    Rejected(u16),

    /// 200 response without a usable subject identifier.
    #[error("profile response is missing the subject identifier")]
    MissingSubject,

    /// Subject identifier collides with the self-issued namespace.
    #[error("profile subject uses a reserved identifier prefix")]
    ReservedSubject,

    /// Response body could not be decoded.
    #[error("malformed profile response: {0}")]
    Malformed(String),

    /// Profile call exceeded its deadline.
    #[error("profile service timed out after {0} seconds")]
    Timeout(u64),

    /// Profile service could not be reached at all (UPSTREAM_UNAVAILABLE).
    #[error("profile service unavailable: {0}")]
    Unavailable(String),

    /// Self-issued token shorter than the minimum length.
    #[error("token too short: {len} < {min}")]
    TooShort { len: usize, min: usize },

    /// Self-issued token contains a character outside base64url.
    #[error("token contains characters outside the base64url alphabet")]
    InvalidAlphabet,
}

impl VerifyError {
    /// Whether the failure means the identity provider itself was unreachable.
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, VerifyError::Timeout(_) | VerifyError::Unavailable(_))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::Rejected(_) => "rejected",
            VerifyError::MissingSubject => "missing_subject",
            VerifyError::ReservedSubject => "reserved_subject",
            VerifyError::Malformed(_) => "malformed",
            VerifyError::Timeout(_) => "timeout",
            VerifyError::Unavailable(_) => "unavailable",
            VerifyError::TooShort { .. } => "too_short",
            VerifyError::InvalidAlphabet => "invalid_alphabet",
        }
    }
}

/// Terminal outcomes of the authorization chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential present, or every presented credential was invalid.
    #[error("missing or invalid authentication token")]
    Unauthorized,

    /// Identity resolved but its quota for the current window is spent.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitBody {
    error: &'static str,
    message: &'static str,
    reset_in_seconds: u64,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorBody::new(
                    "Unauthorized",
                    "Missing or invalid authentication token",
                )),
            )
                .into_response(),
            AuthError::RateLimited { retry_after_secs } => {
                let body = RateLimitBody {
                    error: "Too Many Requests",
                    message: "Rate limit exceeded. Please try again later.",
                    reset_in_seconds: retry_after_secs,
                };
                let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(VerifyError::Timeout(5).is_upstream_unavailable());
        assert!(VerifyError::Unavailable("refused".into()).is_upstream_unavailable());
        assert!(!VerifyError::Rejected(401).is_upstream_unavailable());
        assert!(!VerifyError::InvalidAlphabet.is_upstream_unavailable());
    }

    #[tokio::test]
    async fn test_rate_limited_response_carries_retry_hint() {
        let response = AuthError::RateLimited { retry_after_secs: 7 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "7");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Too Many Requests");
        assert_eq!(body["resetInSeconds"], 7);
    }

    #[tokio::test]
    async fn test_unauthorized_response_shape() {
        let response = AuthError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Unauthorized");
        assert!(body["message"].is_string());
    }
}
