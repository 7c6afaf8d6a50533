//! CurseForge pass-through client.
//!
//! Forwards validated requests with the server-side API key and maps
//! upstream failures to gateway responses. Upstream bodies of failed calls
//! are never relayed.

use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::CurseForgeConfig;
use crate::http::response::error_response;
use crate::observability::metrics;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("CurseForge API not configured")]
    NotConfigured,

    #[error("{0} not found upstream")]
    NotFound(&'static str),

    #[error("CurseForge API returned status {0}")]
    Status(u16),

    #[error("failed to connect to CurseForge API: {0}")]
    Unreachable(String),

    #[error("invalid CurseForge response: {0}")]
    InvalidBody(String),

    #[error("no {0} provided")]
    EmptyRequest(&'static str),
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        match self {
            UpstreamError::NotConfigured => error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable",
                "CurseForge API not configured",
            ),
            UpstreamError::NotFound(what) => {
                error_response(StatusCode::NOT_FOUND, "Not found", format!("{what} not found"))
            }
            UpstreamError::Status(status) => error_response(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Upstream error",
                "CurseForge API error",
            ),
            UpstreamError::Unreachable(ref cause) => {
                tracing::warn!(error = %cause, "CurseForge unreachable");
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service unavailable",
                    "Failed to connect to CurseForge API",
                )
            }
            UpstreamError::InvalidBody(ref cause) => {
                tracing::warn!(error = %cause, "CurseForge returned an unreadable body");
                error_response(StatusCode::BAD_GATEWAY, "Upstream error", "CurseForge API error")
            }
            UpstreamError::EmptyRequest(what) => error_response(
                StatusCode::BAD_REQUEST,
                "Bad request",
                format!("No {what} provided"),
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetModsRequest {
    pub mod_ids: Vec<u64>,
    #[serde(default = "default_filter_pc_only")]
    pub filter_pc_only: bool,
}

fn default_filter_pc_only() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetModFilesRequest {
    pub file_ids: Vec<u64>,
}

/// Result of probing the upstream API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub status: &'static str,
    pub message: String,
    pub api_key_configured: bool,
}

pub struct CurseForgeClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl CurseForgeClient {
    pub fn new(client: reqwest::Client, config: &CurseForgeConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, UpstreamError> {
        self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)
    }

    fn get(&self, path: &str, key: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.api_url))
            .header(API_KEY_HEADER, key)
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
    }

    fn post(&self, path: &str, key: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.api_url))
            .header(API_KEY_HEADER, key)
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.without_url().to_string()))?;
        metrics::record_upstream("curseforge", response.status().as_u16());
        Ok(response)
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, UpstreamError> {
        response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidBody(e.without_url().to_string()))
    }

    /// Probe `/games` to check connectivity and the API key.
    pub async fn test_connection(&self) -> ConnectionReport {
        let Ok(key) = self.key() else {
            return ConnectionReport {
                status: "error",
                message: "CurseForge API key not configured".to_string(),
                api_key_configured: false,
            };
        };

        let (status, message) = match Self::send(self.get("/games", key)).await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                ("ok", "CurseForge API connection successful".to_string())
            }
            Ok(response) => (
                "error",
                format!("CurseForge API returned status {}", response.status().as_u16()),
            ),
            Err(e) => ("error", e.to_string()),
        };

        ConnectionReport {
            status,
            message,
            api_key_configured: true,
        }
    }

    pub async fn get_mod(&self, mod_id: u64) -> Result<Value, UpstreamError> {
        let key = self.key()?;
        let response = Self::send(self.get(&format!("/mods/{mod_id}"), key)).await?;
        match response.status() {
            reqwest::StatusCode::OK => Self::json_body(response).await,
            reqwest::StatusCode::NOT_FOUND => Err(UpstreamError::NotFound("Mod")),
            status => Err(UpstreamError::Status(status.as_u16())),
        }
    }

    pub async fn get_mods(&self, request: &GetModsRequest) -> Result<Value, UpstreamError> {
        let key = self.key()?;
        if request.mod_ids.is_empty() {
            return Err(UpstreamError::EmptyRequest("mod IDs"));
        }

        let body = json!({ "modIds": request.mod_ids, "filterPcOnly": request.filter_pc_only });
        let response = Self::send(self.post("/mods", key).json(&body)).await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }
        Self::json_body(response).await
    }

    pub async fn get_mod_files(&self, request: &GetModFilesRequest) -> Result<Value, UpstreamError> {
        let key = self.key()?;
        if request.file_ids.is_empty() {
            return Err(UpstreamError::EmptyRequest("file IDs"));
        }

        let body = json!({ "fileIds": request.file_ids });
        let response = Self::send(self.post("/mods/files", key).json(&body)).await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }
        Self::json_body(response).await
    }
}
