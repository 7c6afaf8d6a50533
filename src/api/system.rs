use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::http::server::AppState;

/// Endpoints advertised by `/v1/info` and the 404 fallback.
pub const ENDPOINTS: &[&str] = &[
    "GET /health - Health check",
    "GET /v1/info - API information",
    "GET /v1/modpacks?lang= - Modpacks with translated descriptions",
    "GET /v1/modpacks/list - Minimal modpack list",
    "GET /v1/modpacks/{id}?lang= - Full modpack record",
    "GET /v1/modpacks/{id}/features/{lang} - Modpack features",
    "GET /v1/translations - Available languages",
    "GET /v1/translations/{lang} - Translation document",
    "GET /v1/curseforge/test - CurseForge connectivity",
    "GET /v1/curseforge/mods/{modId} - Single mod",
    "POST /v1/curseforge/mods - Batch mods",
    "POST /v1/curseforge/mods/files - Batch mod files",
];

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: &'static [&'static str],
    pub rate_limit: RateLimitInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub window_ms: u64,
    pub max_requests: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundBody {
    pub error: &'static str,
    pub message: &'static str,
    pub available_endpoints: Vec<&'static str>,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn info(State(state): State<AppState>) -> Json<ApiInfo> {
    Json(ApiInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
        endpoints: ENDPOINTS,
        rate_limit: RateLimitInfo {
            window_ms: state.limiter.window().as_millis() as u64,
            max_requests: state.limiter.max_requests(),
        },
    })
}

pub async fn not_found() -> impl IntoResponse {
    let available_endpoints = ENDPOINTS
        .iter()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|path| path.split_once('?').map_or(path, |(path, _)| path))
        .collect();

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            error: "Not found",
            message: "The requested endpoint does not exist",
            available_endpoints,
        }),
    )
}
