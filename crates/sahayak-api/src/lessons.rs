// Lesson preparation routes

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{default_user, PromptResponse};
use crate::AppState;
use sahayak_core::prompts;

/// Request to generate a lesson plan
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PrepareLessonRequest {
    #[schema(example = "Water Cycle")]
    pub topic: String,
    pub grade: u8,
    #[schema(example = "Science")]
    pub subject: String,
    /// Lesson length in minutes
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_duration() -> u32 {
    45
}

/// Request to generate study materials
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StudyMaterialsRequest {
    pub topic: String,
    pub grade: u8,
    pub subject: String,
    #[serde(default = "default_material_type")]
    pub material_type: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_material_type() -> String {
    "comprehensive".to_string()
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/lesson/prepare", post(prepare_lesson))
        .route("/lesson/materials", post(generate_study_materials))
        .with_state(state)
}

/// POST /lesson/prepare - Generate a full lesson plan
#[utoipa::path(
    post,
    path = "/lesson/prepare",
    request_body = PrepareLessonRequest,
    responses(
        (status = 200, description = "Generated lesson plan", body = PromptResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "lessons"
)]
pub async fn prepare_lesson(
    State(state): State<AppState>,
    Form(req): Form<PrepareLessonRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("lesson_{}_{}_{}", req.topic, req.grade, Uuid::new_v4()));
    let prompt = prompts::lesson_plan_prompt(&req.topic, &req.subject, req.grade, req.duration);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to prepare lesson: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}

/// POST /lesson/materials - Generate study materials for a topic
#[utoipa::path(
    post,
    path = "/lesson/materials",
    request_body = StudyMaterialsRequest,
    responses(
        (status = 200, description = "Generated study material", body = PromptResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "lessons"
)]
pub async fn generate_study_materials(
    State(state): State<AppState>,
    Form(req): Form<StudyMaterialsRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let session_id = format!("materials_{}_{}_{}", req.topic, req.grade, Uuid::new_v4());
    let prompt =
        prompts::study_materials_prompt(&req.topic, &req.subject, req.grade, &req.material_type);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate study materials: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}
