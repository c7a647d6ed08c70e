// Multimodal chat route
//
// Accepts text, audio, and image input from teachers as multipart form data,
// wraps text queries in the mentor system prompt, and relays the turn to the
// agent through the session registry.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::AppState;
use sahayak_core::prompts;

/// Reply to a chat turn
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    /// Agent reply text
    pub response: String,
    /// Session the turn ran on; generated when the request carried none
    pub session_id: String,
}

/// Decoded multipart fields of one chat request
#[derive(Debug, Default)]
struct ChatForm {
    query: Option<String>,
    user_id: Option<String>,
    session_id: Option<String>,
    language: Option<String>,
    audio: Option<Vec<u8>>,
    image: Option<Vec<u8>>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(state)
}

/// POST /chat - Send one text/audio/image turn to the assistant
#[utoipa::path(
    post,
    path = "/chat",
    responses(
        (status = 200, description = "Agent reply", body = ChatResponse),
        (status = 400, description = "No query, audio_file, or image_file provided"),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChatResponse>, StatusCode> {
    let form = read_form(multipart).await?;

    let query = form.query.unwrap_or_default();
    if query.is_empty() && form.audio.is_none() && form.image.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let user_id = form.user_id.unwrap_or_else(crate::common::default_user);
    let session_id = form
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let language = form.language.unwrap_or_else(crate::common::default_language);

    // Text queries get the mentor system prompt; pure audio/image turns go
    // through untouched.
    let prompt = if query.is_empty() {
        query
    } else {
        prompts::mentor_prompt(&language, &query)
    };

    let reply = state
        .assistant
        .ask(&user_id, &session_id, &prompt, form.audio, form.image)
        .await
        .map_err(|e| {
            tracing::error!("Chat turn failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let response = state.translator.ensure_language(&reply.text, &language).await;

    Ok(Json(ChatResponse {
        response,
        session_id,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<ChatForm, StatusCode> {
    let mut form = ChatForm::default();
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Malformed multipart request: {}", e);
            StatusCode::BAD_REQUEST
        })?;
        let Some(field) = field else {
            break;
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "query" => form.query = Some(text_field(field).await?),
            "user_id" => form.user_id = Some(text_field(field).await?),
            "session_id" => form.session_id = Some(text_field(field).await?),
            "language" => form.language = Some(text_field(field).await?),
            "audio_file" => form.audio = Some(bytes_field(field).await?),
            "image_file" => form.image = Some(bytes_field(field).await?),
            _ => {}
        }
    }
    // Empty uploads count as absent.
    if form.audio.as_ref().is_some_and(Vec::is_empty) {
        form.audio = None;
    }
    if form.image.as_ref().is_some_and(Vec::is_empty) {
        form.image = None;
    }
    Ok(form)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, StatusCode> {
    field.text().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        StatusCode::BAD_REQUEST
    })
}

async fn bytes_field(field: axum::extract::multipart::Field<'_>) -> Result<Vec<u8>, StatusCode> {
    Ok(field
        .bytes()
        .await
        .map_err(|e| {
            tracing::warn!("Failed to read multipart upload: {}", e);
            StatusCode::BAD_REQUEST
        })?
        .to_vec())
}
