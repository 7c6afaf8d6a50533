use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::data::models::{Feature, ModpackDetail, ModpackListItem, ModpackSummary, UiTranslations};
use crate::data::DataError;
use crate::http::response::not_found;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    fn resolve<'a>(&'a self, state: &'a AppState) -> &'a str {
        self.lang
            .as_deref()
            .filter(|lang| !lang.is_empty())
            .unwrap_or(&state.config.data.query_language)
    }
}

#[derive(Serialize)]
pub struct ModpacksResponse {
    pub count: usize,
    pub modpacks: Vec<ModpackSummary>,
    pub ui: UiTranslations,
}

#[derive(Serialize)]
pub struct ModpackListResponse {
    pub count: usize,
    pub modpacks: Vec<ModpackListItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesResponse {
    pub modpack_id: String,
    pub language: String,
    pub features: Vec<Feature>,
}

pub async fn list_modpacks(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> Result<Json<ModpacksResponse>, DataError> {
    let lang = query.resolve(&state);
    let modpacks = state.data.modpacks()?;
    let translations = state.data.translations(lang)?;

    let modpacks: Vec<ModpackSummary> = modpacks
        .iter()
        .map(|mp| ModpackSummary::new(mp, translations.short_description(&mp.id)))
        .collect();

    Ok(Json(ModpacksResponse {
        count: modpacks.len(),
        modpacks,
        ui: translations.ui.clone(),
    }))
}

pub async fn list_minimal(
    State(state): State<AppState>,
) -> Result<Json<ModpackListResponse>, DataError> {
    let modpacks: Vec<ModpackListItem> = state
        .data
        .modpacks()?
        .iter()
        .map(ModpackListItem::from)
        .collect();

    Ok(Json(ModpackListResponse {
        count: modpacks.len(),
        modpacks,
    }))
}

pub async fn get_modpack(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Response, DataError> {
    let Some(modpack) = state.data.modpack(&id)? else {
        return Ok(not_found(format!("Modpack with ID '{id}' does not exist")));
    };
    let translations = state.data.translations(query.resolve(&state))?;

    Ok(Json(ModpackDetail::new(modpack, &translations)).into_response())
}

pub async fn get_features(
    State(state): State<AppState>,
    Path((id, lang)): Path<(String, String)>,
) -> Result<Response, DataError> {
    if state.data.modpack(&id)?.is_none() {
        return Ok(not_found(format!("Modpack with ID '{id}' does not exist")));
    }
    let features = state.data.features(&id, &lang)?;

    Ok(Json(FeaturesResponse {
        modpack_id: id,
        language: lang,
        features,
    })
    .into_response())
}
