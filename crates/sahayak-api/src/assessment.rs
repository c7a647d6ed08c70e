// Assessment routes: question sets and quizzes

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{default_user, PromptResponse};
use crate::AppState;
use sahayak_core::prompts;

/// Request to generate assessment questions
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateAssessmentRequest {
    pub topic: String,
    pub grade: u8,
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default = "default_question_count")]
    pub count: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_question_type() -> String {
    "mcq".to_string()
}

fn default_question_count() -> u32 {
    5
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Generated assessment questions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssessmentResponse {
    pub questions: String,
    pub topic: String,
    pub grade: u8,
}

/// Request to generate a quiz across topics
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateQuizRequest {
    /// JSON array of topic names, e.g. `["Plants","Animals"]`
    #[schema(example = "[\"Plants\",\"Animals\"]")]
    pub topics: String,
    pub grade: u8,
    #[serde(default = "default_quiz_type")]
    pub quiz_type: String,
    /// Quiz length in minutes
    #[serde(default = "default_quiz_duration")]
    pub duration: u32,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_quiz_type() -> String {
    "mixed".to_string()
}

fn default_quiz_duration() -> u32 {
    30
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/assessment/generate", post(generate_assessment))
        .route("/assessment/quiz", post(generate_quiz))
        .with_state(state)
}

/// POST /assessment/generate - Generate assessment questions for a topic
#[utoipa::path(
    post,
    path = "/assessment/generate",
    request_body = GenerateAssessmentRequest,
    responses(
        (status = 200, description = "Generated questions", body = AssessmentResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "assessment"
)]
pub async fn generate_assessment(
    State(state): State<AppState>,
    Form(req): Form<GenerateAssessmentRequest>,
) -> Result<Json<AssessmentResponse>, StatusCode> {
    let session_id = format!("assessment_{}_{}_{}", req.topic, req.grade, Uuid::new_v4());
    let prompt = prompts::assessment_prompt(
        &req.topic,
        req.grade,
        &req.question_type,
        req.count,
        &req.difficulty,
    );

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate assessment: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(AssessmentResponse {
        questions: reply.text,
        topic: req.topic,
        grade: req.grade,
    }))
}

/// POST /assessment/quiz - Generate a quiz covering several topics
#[utoipa::path(
    post,
    path = "/assessment/quiz",
    request_body = GenerateQuizRequest,
    responses(
        (status = 200, description = "Generated quiz", body = PromptResponse),
        (status = 400, description = "topics is not a JSON array"),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "assessment"
)]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Form(req): Form<GenerateQuizRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let topics: Vec<String> = serde_json::from_str(&req.topics).map_err(|e| {
        tracing::warn!("Invalid topics payload: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let session_id = format!("quiz_{}_{}", req.grade, Uuid::new_v4());
    let prompt = prompts::quiz_prompt(&topics, req.grade, &req.quiz_type, req.duration);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate quiz: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}
