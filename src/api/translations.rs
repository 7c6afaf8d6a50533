use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::data::models::AvailableLanguages;
use crate::data::DataError;
use crate::http::response::not_found;
use crate::http::server::AppState;

pub async fn list_languages(State(state): State<AppState>) -> Json<AvailableLanguages> {
    Json(state.data.available_languages())
}

pub async fn get_translations(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> Result<Response, DataError> {
    match state.data.translations(&lang) {
        Ok(doc) => Ok(Json(doc.as_ref().clone()).into_response()),
        Err(DataError::UnsupportedLanguage(_)) => {
            let available = state.data.available_languages().available_languages;
            Ok(not_found(format!(
                "Language '{lang}' is not supported. Available languages: {}",
                available.join(", ")
            )))
        }
        Err(e) => Err(e),
    }
}
