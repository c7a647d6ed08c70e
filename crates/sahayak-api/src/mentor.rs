// Teacher mentoring routes: classroom tips and multi-grade strategies

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

/// Request for classroom management tips
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClassroomTipsRequest {
    pub topic: String,
    pub grade: u8,
    #[serde(default = "default_classroom_size")]
    pub classroom_size: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_classroom_size() -> String {
    "medium".to_string()
}

/// Request for multi-grade teaching strategies
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MultiGradeRequest {
    /// JSON array of grade numbers, e.g. `[4,5,6]`
    #[schema(example = "[4,5,6]")]
    pub grades: String,
    pub subject: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/teacher/classroom-tips", post(classroom_tips))
        .route("/teacher/multi-grade-strategies", post(multi_grade_strategies))
        .with_state(state)
}

/// POST /teacher/classroom-tips - Classroom management and teaching tips
#[utoipa::path(
    post,
    path = "/teacher/classroom-tips",
    request_body = ClassroomTipsRequest,
    responses(
        (status = 200, description = "Teaching tips", body = PromptResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "mentor"
)]
pub async fn classroom_tips(
    State(state): State<AppState>,
    Form(req): Form<ClassroomTipsRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let session_id = format!("tips_{}_{}_{}", req.topic, req.grade, Uuid::new_v4());
    let prompt = prompts::classroom_tips_prompt(&req.topic, req.grade, &req.classroom_size);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get classroom tips: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}

/// POST /teacher/multi-grade-strategies - Strategies for mixed-grade classrooms
#[utoipa::path(
    post,
    path = "/teacher/multi-grade-strategies",
    request_body = MultiGradeRequest,
    responses(
        (status = 200, description = "Teaching strategies", body = PromptResponse),
        (status = 400, description = "grades is not a JSON array"),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "mentor"
)]
pub async fn multi_grade_strategies(
    State(state): State<AppState>,
    Form(req): Form<MultiGradeRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let grades: Vec<u8> = serde_json::from_str(&req.grades).map_err(|e| {
        tracing::warn!("Invalid grades payload: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let session_id = format!("multigrade_{}_{}", req.subject, Uuid::new_v4());
    let prompt = prompts::multi_grade_prompt(&req.subject, &grades);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get multi-grade strategies: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}
