// Session continuation route

use axum::{
    extract::State,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Request to continue an existing session
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContinueSessionRequest {
    pub session_id: String,
    pub user_id: String,
}

/// Session status probe result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContinueSessionResponse {
    pub session_id: String,
    /// "active" when a conversation thread exists for the key
    pub status: &'static str,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/session/continue", post(continue_session))
        .with_state(state)
}

/// POST /session/continue - Probe whether a conversation thread is live
#[utoipa::path(
    post,
    path = "/session/continue",
    request_body = ContinueSessionRequest,
    responses(
        (status = 200, description = "Session status", body = ContinueSessionResponse)
    ),
    tag = "sessions"
)]
pub async fn continue_session(
    State(state): State<AppState>,
    Form(req): Form<ContinueSessionRequest>,
) -> Json<ContinueSessionResponse> {
    let status = if state.assistant.has_session(&req.user_id, &req.session_id).await {
        "active"
    } else {
        "unknown"
    };
    Json(ContinueSessionResponse {
        session_id: req.session_id,
        status,
    })
}
