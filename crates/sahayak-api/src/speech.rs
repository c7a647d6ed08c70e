// Speech synthesis route

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::AppState;

/// Request to synthesize speech
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SynthesizeSpeechRequest {
    pub text: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/synthesize_speech", post(synthesize_speech))
        .with_state(state)
}

/// POST /synthesize_speech - Synthesize speech and return MP3 audio
#[utoipa::path(
    post,
    path = "/synthesize_speech",
    request_body = SynthesizeSpeechRequest,
    responses(
        (status = 200, description = "MP3 audio bytes"),
        (status = 500, description = "Synthesis failed or not configured")
    ),
    tag = "speech"
)]
pub async fn synthesize_speech(
    State(state): State<AppState>,
    Form(req): Form<SynthesizeSpeechRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let audio = state.speech.synthesize(&req.text).await.map_err(|e| {
        tracing::error!("Speech synthesis failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}
