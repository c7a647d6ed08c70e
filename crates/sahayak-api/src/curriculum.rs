// Curriculum planning routes: year plan, monthly plan, 5-day schedule

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Form, Json, Router,
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{default_curriculum, default_language, default_user, PromptResponse};
use crate::AppState;
use sahayak_core::prompts;

/// Request to generate a year-long curriculum
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateCurriculumRequest {
    pub grade: u8,
    /// JSON array of subject names, e.g. `["Science","Mathematics"]`
    #[schema(example = "[\"Science\",\"Mathematics\"]")]
    pub subjects: String,
    #[serde(default = "default_curriculum")]
    pub curriculum_type: String,
    #[serde(default = "default_academic_year")]
    pub academic_year: String,
    #[serde(default = "default_user")]
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_academic_year() -> String {
    "2024-25".to_string()
}

/// Request to generate a monthly plan for one subject
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MonthlyPlanRequest {
    pub grade: u8,
    pub subject: String,
    #[schema(example = "July")]
    pub month: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// Request to generate a 5-day teaching schedule
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateScheduleRequest {
    pub curriculum: String,
    pub grade: u8,
    pub subject: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_user")]
    pub user_id: String,
}

/// Generated 5-day schedule
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub schedule: String,
    pub working_days: Vec<String>,
    pub curriculum: String,
    pub grade: u8,
    pub subject: String,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/curriculum/generate", post(generate_curriculum))
        .route("/curriculum/monthly-plan", post(generate_monthly_plan))
        .route("/api/schedule/generate", post(generate_schedule))
        .with_state(state)
}

/// POST /curriculum/generate - Generate a year-long curriculum
#[utoipa::path(
    post,
    path = "/curriculum/generate",
    request_body = GenerateCurriculumRequest,
    responses(
        (status = 200, description = "Generated curriculum plan", body = PromptResponse),
        (status = 400, description = "subjects is not a JSON array"),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "curriculum"
)]
pub async fn generate_curriculum(
    State(state): State<AppState>,
    Form(req): Form<GenerateCurriculumRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let subjects: Vec<String> = serde_json::from_str(&req.subjects).map_err(|e| {
        tracing::warn!("Invalid subjects payload: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let session_id = req
        .session_id
        .unwrap_or_else(|| format!("curriculum_{}_{}", req.grade, Uuid::new_v4()));
    let prompt = prompts::curriculum_plan_prompt(
        req.grade,
        &subjects,
        &req.curriculum_type,
        &req.academic_year,
    );

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate curriculum: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}

/// POST /curriculum/monthly-plan - Generate a detailed monthly plan
#[utoipa::path(
    post,
    path = "/curriculum/monthly-plan",
    request_body = MonthlyPlanRequest,
    responses(
        (status = 200, description = "Generated monthly plan", body = PromptResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "curriculum"
)]
pub async fn generate_monthly_plan(
    State(state): State<AppState>,
    Form(req): Form<MonthlyPlanRequest>,
) -> Result<Json<PromptResponse>, StatusCode> {
    let session_id = format!("monthly_{}_{}_{}", req.subject, req.grade, Uuid::new_v4());
    let prompt = prompts::monthly_plan_prompt(&req.subject, req.grade, &req.month);

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate monthly plan: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(PromptResponse {
        response: reply.text,
        session_id,
    }))
}

/// POST /api/schedule/generate - Generate a 5-day schedule from corpus content
#[utoipa::path(
    post,
    path = "/api/schedule/generate",
    request_body = GenerateScheduleRequest,
    responses(
        (status = 200, description = "Generated schedule", body = ScheduleResponse),
        (status = 500, description = "Agent invocation failed")
    ),
    tag = "curriculum"
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    Form(req): Form<GenerateScheduleRequest>,
) -> Result<Json<ScheduleResponse>, StatusCode> {
    let working_days = next_working_days(Utc::now().date_naive(), 5);
    let prompt = prompts::schedule_prompt(
        &req.curriculum,
        req.grade,
        &req.subject,
        &req.language,
        &working_days,
    );

    let session_id = format!(
        "schedule_{}_{}_{}_{}",
        req.curriculum,
        req.grade,
        req.subject.replace(' ', "_"),
        Uuid::new_v4()
    );

    let reply = state
        .assistant
        .ask(&req.user_id, &session_id, &prompt, None, None)
        .await
        .map_err(|e| {
            tracing::error!("Failed to generate schedule: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ScheduleResponse {
        schedule: reply.text,
        working_days,
        curriculum: req.curriculum,
        grade: req.grade,
        subject: req.subject,
    }))
}

/// Next `count` weekdays strictly after `from`, formatted for the prompt
fn next_working_days(from: NaiveDate, count: usize) -> Vec<String> {
    let mut days = Vec::with_capacity(count);
    let mut current = from;
    while days.len() < count {
        let Some(next) = current.checked_add_days(Days::new(1)) else {
            break;
        };
        current = next;
        if current.weekday().number_from_monday() <= 5 {
            days.push(current.format("%A, %B %d").to_string());
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_days_skip_weekends() {
        // 2026-08-06 is a Thursday.
        let thursday = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let days = next_working_days(thursday, 5);
        assert_eq!(
            days,
            vec![
                "Friday, August 07",
                "Monday, August 10",
                "Tuesday, August 11",
                "Wednesday, August 12",
                "Thursday, August 13",
            ]
        );
    }

    #[test]
    fn test_working_days_start_monday_after_friday() {
        // 2026-08-07 is a Friday; the next working day is Monday.
        let friday = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let days = next_working_days(friday, 2);
        assert_eq!(days, vec!["Monday, August 10", "Tuesday, August 11"]);
    }

    #[test]
    fn test_subjects_payload_must_be_json_array() {
        let parsed: Result<Vec<String>, _> = serde_json::from_str("Science, Maths");
        assert!(parsed.is_err());
        let parsed: Vec<String> = serde_json::from_str(r#"["Science","Maths"]"#).unwrap();
        assert_eq!(parsed, vec!["Science", "Maths"]);
    }
}
