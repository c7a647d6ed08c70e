// Learning routes: concept explanation and activity generation

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{default_curriculum, default_language, default_user, PromptResponse};
use crate::AppState;
use sahayak_core::{prompts, ConceptQuery, ExplanationSource};

/// Request to explain a concept
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExplainConceptRequest {
    #[schema(example = "Photosynthesis")]
    pub concept: String,
    #[schema(example = 6)]
    pub grade: u8,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default = "default_curriculum")]
    pub curriculum_type: String,
}

/// Concept explanation with its retrieval provenance
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExplainConceptResponse {
    pub response: String,
    pub session_id: String,
    pub concept: String,
    pub grade: u8,
    pub language: String,
    pub curriculum_type: String,
    pub source: ExplanationSource,
    pub curriculum_found: bool,
    /// Present only when retrieval failed and the templated answer was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request to generate activities for a concept
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateActivitiesRequest {
    pub concept: String,
    pub grade: u8,
    #[serde(default = "default_activity_type")]
    pub activity_type: String,
    #[serde(default = "default_activity_count")]
    pub count: u32,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_activity_type() -> String {
    "classroom".to_string()
}

fn default_activity_count() -> u32 {
    3
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/learning/concept", post(explain_concept))
        .route("/learning/activities", post(generate_activities))
        .with_state(state)
}

/// POST /learning/concept - Explain a concept, curriculum source first
///
/// Never returns a hard error: when retrieval is unavailable the reply is a
/// templated generic explanation with `source = "fallback"`.
#[utoipa::path(
    post,
    path = "/learning/concept",
    request_body = ExplainConceptRequest,
    responses(
        (status = 200, description = "Explanation with provenance", body = ExplainConceptResponse)
    ),
    tag = "learning"
)]
pub async fn explain_concept(
    State(state): State<AppState>,
    Form(req): Form<ExplainConceptRequest>,
) -> Json<ExplainConceptResponse> {
    let session_id = req.session_id.clone().unwrap_or_else(|| {
        format!("learning_{}_{}_{}", req.concept, req.grade, Uuid::new_v4())
    });

    let query = ConceptQuery {
        concept: req.concept.clone(),
        grade: req.grade,
        language: req.language.clone(),
        curriculum_type: req.curriculum_type.clone(),
    };

    let result = state
        .assistant
        .explain_concept(&req.user_id, &session_id, &query)
        .await;

    Json(ExplainConceptResponse {
        response: result.response,
        session_id,
        concept: req.concept,
        grade: req.grade,
        language: req.language,
        curriculum_type: req.curriculum_type,
        source: result.source,
        curriculum_found: result.curriculum_found,
        error: result.error,
    })
}

/// POST /learning/activities - Generate activities for teaching a concept
#[utoipa::path(
    post,
    path = "/learning/activities",
    request_body = GenerateActivitiesRequest,
    responses(
        (status = 200, description = "Generated activities", body = PromptResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "learning"
)]
pub async fn generate_activities(
    State(state): State<AppState>,
    Form(req): Form<GenerateActivitiesRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let session_id = format!("activities_{}_{}_{}", req.concept, req.grade, Uuid::new_v4());
    let prompt = prompts::activities_prompt(&req.concept, req.grade, &req.activity_type, req.count);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate activities: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_concept_request_defaults() {
        let json = r#"{"concept": "Photosynthesis", "grade": 6}"#;
        let req: ExplainConceptRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.concept, "Photosynthesis");
        assert_eq!(req.grade, 6);
        assert_eq!(req.language, "en");
        assert_eq!(req.user_id, "default_user");
        assert_eq!(req.curriculum_type, "ncert");
        assert_eq!(req.session_id, None);
    }

    #[test]
    fn test_activities_request_defaults() {
        let json = r#"{"concept": "Fractions", "grade": 4}"#;
        let req: GenerateActivitiesRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.activity_type, "classroom");
        assert_eq!(req.count, 3);
    }
}
