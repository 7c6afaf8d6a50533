//! Route handlers.
//!
//! # Data Flow
//! ```text
//! public:    /health, /v1/info, /v1/translations      → system.rs, translations.rs
//! protected: /v1/modpacks*, /v1/translations/{lang}   → modpacks.rs, translations.rs
//!            /v1/curseforge/*                         → curseforge.rs
//! ```
//! Protected handlers run after identity resolution and rate limiting, so
//! they may read `ResolvedIdentity` from request extensions.

pub mod curseforge;
pub mod modpacks;
pub mod system;
pub mod translations;

use axum::response::{IntoResponse, Response};

use crate::data::DataError;
use crate::http::response::{internal_error, not_found};

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        match self {
            DataError::UnsupportedLanguage(lang) => {
                not_found(format!("Language '{lang}' not supported"))
            }
            DataError::NotFound(ref path) => {
                tracing::error!(path = %path.display(), "Data file missing");
                not_found("Requested data not found")
            }
            DataError::Io { .. } | DataError::Parse { .. } => {
                tracing::error!(error = %self, "Failed to load launcher data");
                internal_error("Failed to load launcher data")
            }
        }
    }
}
