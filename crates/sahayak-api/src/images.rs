// Image generation routes
//
// The agent runtime records generated images as session artifacts; when one
// is present its bytes surface here as a data:image/png;base64 URI.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{default_user, image_data_uri};
use crate::AppState;
use sahayak_core::prompts;

/// Request to generate an educational image
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateImageRequest {
    #[schema(example = "Parts of a flowering plant")]
    pub prompt: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_style() -> String {
    "educational".to_string()
}

/// Request to generate a specific diagram type
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateDiagramRequest {
    pub concept: String,
    #[serde(default = "default_diagram_type")]
    pub diagram_type: String,
    pub grade: u8,
    #[serde(default = "default_user")]
    pub user_id: String,
}

fn default_diagram_type() -> String {
    "flowchart".to_string()
}

/// Reply carrying the agent text and, when produced, the image data URI
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImageResponse {
    pub response: String,
    /// `data:image/png;base64,...` URI of the generated image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub session_id: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/image/generate", post(generate_image))
        .route("/image/generate-diagram", post(generate_diagram))
        .with_state(state)
}

/// POST /image/generate - Generate an educational image
#[utoipa::path(
    post,
    path = "/image/generate",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Agent reply, with image when produced", body = ImageResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "images"
)]
pub async fn generate_image(
    State(state): State<AppState>,
    Form(req): Form<GenerateImageRequest>,
) -> Result<Json<ImageResponse>, StatusCode> {
    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("image_{}", Uuid::new_v4()));
    let prompt = prompts::image_prompt(&req.prompt, &req.style);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate image: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ImageResponse {
        response: reply.text,
        image_url: reply.image.as_deref().map(image_data_uri),
        session_id,
    }))
}

/// POST /image/generate-diagram - Generate an educational diagram
#[utoipa::path(
    post,
    path = "/image/generate-diagram",
    request_body = GenerateDiagramRequest,
    responses(
        (status = 200, description = "Agent reply, with diagram when produced", body = ImageResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "images"
)]
pub async fn generate_diagram(
    State(state): State<AppState>,
    Form(req): Form<GenerateDiagramRequest>,
) -> Result<Json<ImageResponse>, StatusCode> {
    let session_id = format!("diagram_{}_{}_{}", req.concept, req.grade, Uuid::new_v4());
    let prompt = prompts::diagram_prompt(&req.concept, &req.diagram_type, req.grade);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate diagram: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ImageResponse {
        response: reply.text,
        image_url: reply.image.as_deref().map(image_data_uri),
        session_id,
    }))
}
