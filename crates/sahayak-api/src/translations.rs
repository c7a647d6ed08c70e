// UI translation routes

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::common::default_language;
use crate::AppState;

/// Request to translate one text
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TranslateTextRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_language")]
    pub target_language: String,
    #[serde(default = "default_language")]
    pub source_language: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TranslateTextResponse {
    pub translated_text: String,
}

/// Request to translate several texts at once
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TranslateBatchRequest {
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default = "default_language")]
    pub target_language: String,
    #[serde(default = "default_language")]
    pub source_language: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TranslateBatchResponse {
    pub translated_texts: Vec<String>,
}

/// UI-string table in one language
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TranslationsResponse {
    pub translations: BTreeMap<String, String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/translate-text", post(translate_text))
        .route("/api/translate-batch", post(translate_batch))
        .route("/api/translations/:language_code", get(get_translations))
        .with_state(state)
}

/// POST /api/translate-text - Translate one text (best effort)
#[utoipa::path(
    post,
    path = "/api/translate-text",
    request_body = TranslateTextRequest,
    responses(
        (status = 200, description = "Translated text, or the input when translation is unavailable", body = TranslateTextResponse)
    ),
    tag = "translations"
)]
pub async fn translate_text(
    State(state): State<AppState>,
    Json(req): Json<TranslateTextRequest>,
) -> Json<TranslateTextResponse> {
    let translated_text = state
        .translator
        .translate(&req.text, &req.source_language, &req.target_language)
        .await;
    Json(TranslateTextResponse { translated_text })
}

/// POST /api/translate-batch - Translate several texts in one request
#[utoipa::path(
    post,
    path = "/api/translate-batch",
    request_body = TranslateBatchRequest,
    responses(
        (status = 200, description = "Translated texts in request order", body = TranslateBatchResponse)
    ),
    tag = "translations"
)]
pub async fn translate_batch(
    State(state): State<AppState>,
    Json(req): Json<TranslateBatchRequest>,
) -> Json<TranslateBatchResponse> {
    let translated_texts = state
        .translator
        .translate_batch(&req.texts, &req.source_language, &req.target_language)
        .await;
    Json(TranslateBatchResponse { translated_texts })
}

/// GET /api/translations/{language_code} - Full UI-string table
#[utoipa::path(
    get,
    path = "/api/translations/{language_code}",
    params(
        ("language_code" = String, Path, description = "Target language code, e.g. hi")
    ),
    responses(
        (status = 200, description = "UI strings in the requested language", body = TranslationsResponse)
    ),
    tag = "translations"
)]
pub async fn get_translations(
    State(state): State<AppState>,
    Path(language_code): Path<String>,
) -> Json<TranslationsResponse> {
    let translations = state.translator.ui_translations(&language_code).await;
    Json(TranslationsResponse { translations })
}
