use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::http::server::AppState;
use crate::upstream::curseforge::{ConnectionReport, GetModFilesRequest, GetModsRequest};
use crate::upstream::UpstreamError;

pub async fn test_connection(State(state): State<AppState>) -> Json<ConnectionReport> {
    Json(state.curseforge.test_connection().await)
}

pub async fn get_mod(
    State(state): State<AppState>,
    Path(mod_id): Path<u64>,
) -> Result<Json<Value>, UpstreamError> {
    state.curseforge.get_mod(mod_id).await.map(Json)
}

pub async fn get_mods(
    State(state): State<AppState>,
    Json(request): Json<GetModsRequest>,
) -> Result<Json<Value>, UpstreamError> {
    state.curseforge.get_mods(&request).await.map(Json)
}

pub async fn get_mod_files(
    State(state): State<AppState>,
    Json(request): Json<GetModFilesRequest>,
) -> Result<Json<Value>, UpstreamError> {
    state.curseforge.get_mod_files(&request).await.map(Json)
}
