// Sahayak API server
// Decision: every endpoint is a thin adapter - build a prompt, run it through
// the session registry + orchestrator, shape the JSON reply
// Decision: the concept-explanation endpoint never surfaces a hard error

mod assessment;
mod chat;
mod common;
mod config;
mod corpus;
mod curriculum;
mod images;
mod learning;
mod lessons;
mod mentor;
mod services;
mod sessions;
mod speech;
mod translations;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use sahayak_core::HttpAgentRuntime;
use services::{AssistantService, CorpusService, SpeechService, TranslationService};

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<AssistantService>,
    pub translator: Arc<TranslationService>,
    pub speech: Arc<SpeechService>,
    pub corpus: Arc<CorpusService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        chat::chat,
        learning::explain_concept,
        learning::generate_activities,
        lessons::prepare_lesson,
        lessons::generate_study_materials,
        curriculum::generate_curriculum,
        curriculum::generate_monthly_plan,
        curriculum::generate_schedule,
        assessment::generate_assessment,
        assessment::generate_quiz,
        images::generate_image,
        images::generate_diagram,
        mentor::classroom_tips,
        mentor::multi_grade_strategies,
        translations::translate_text,
        translations::translate_batch,
        translations::get_translations,
        speech::synthesize_speech,
        corpus::list_corpus_books,
        corpus::ncert_resources,
        sessions::continue_session,
    ),
    components(
        schemas(
            common::PromptResponse,
            chat::ChatResponse,
            learning::ExplainConceptRequest,
            learning::ExplainConceptResponse,
            learning::GenerateActivitiesRequest,
            lessons::PrepareLessonRequest,
            lessons::StudyMaterialsRequest,
            curriculum::GenerateCurriculumRequest,
            curriculum::MonthlyPlanRequest,
            curriculum::GenerateScheduleRequest,
            curriculum::ScheduleResponse,
            assessment::GenerateAssessmentRequest,
            assessment::AssessmentResponse,
            assessment::GenerateQuizRequest,
            images::GenerateImageRequest,
            images::GenerateDiagramRequest,
            images::ImageResponse,
            mentor::ClassroomTipsRequest,
            mentor::MultiGradeRequest,
            translations::TranslateTextRequest,
            translations::TranslateTextResponse,
            translations::TranslateBatchRequest,
            translations::TranslateBatchResponse,
            translations::TranslationsResponse,
            speech::SynthesizeSpeechRequest,
            corpus::CorpusBooksResponse,
            corpus::ResourceEntry,
            corpus::ResourcesResponse,
            sessions::ContinueSessionRequest,
            sessions::ContinueSessionResponse,
            sahayak_core::ExplanationSource,
        )
    ),
    tags(
        (name = "chat", description = "Multimodal assistant chat"),
        (name = "learning", description = "Concept explanation and activities"),
        (name = "lessons", description = "Lesson plans and study materials"),
        (name = "curriculum", description = "Curriculum and schedule planning"),
        (name = "assessment", description = "Questions and quizzes"),
        (name = "images", description = "Educational image generation"),
        (name = "mentor", description = "Classroom guidance for teachers"),
        (name = "translations", description = "UI translation endpoints"),
        (name = "speech", description = "Speech synthesis"),
        (name = "corpus", description = "Curriculum corpus introspection"),
        (name = "sessions", description = "Session continuation")
    ),
    info(
        title = "Sahayak API",
        version = "0.1.0",
        description = "Backend for the Sahayak teaching assistant: text, audio, and image conversations plus lesson, curriculum, and assessment generation",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sahayak_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("sahayak-api starting...");

    let config = config::ApiConfig::from_env();
    tracing::info!(
        runtime_url = %config.runtime_url,
        app_name = %config.app_name,
        registry_capacity = config.registry_capacity,
        timeout_secs = config.agent_timeout.as_secs(),
        "Agent runtime configured"
    );

    let runtime = Arc::new(HttpAgentRuntime::new(&config.runtime_url, &config.app_name));
    let state = AppState {
        assistant: Arc::new(AssistantService::new(
            runtime,
            &config.app_name,
            config.registry_capacity,
            config.agent_timeout,
        )),
        translator: Arc::new(TranslationService::new(config.translate_url.clone())),
        speech: Arc::new(SpeechService::new(config.tts_url.clone())),
        corpus: Arc::new(CorpusService::new(config.corpus_url.clone())),
    };

    if !state.translator.remote_enabled() {
        tracing::warn!("TRANSLATE_API_URL not set; UI translation limited to fallback tables");
    }
    if config.tts_url.is_none() {
        tracing::warn!("TTS_API_URL not set; speech synthesis disabled");
    }
    if config.corpus_url.is_none() {
        tracing::warn!("CORPUS_API_URL not set; corpus book listing disabled");
    }

    let app = build_router(state, &config.api_prefix);

    // Add Swagger UI
    let app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Load CORS allowed origins (only needed when the UI is served from a
    // different origin than the API)
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ]),
        )
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build the application router with an optional API prefix
fn build_router(state: AppState, api_prefix: &str) -> Router {
    let api_routes = Router::new()
        .merge(chat::routes(state.clone()))
        .merge(learning::routes(state.clone()))
        .merge(lessons::routes(state.clone()))
        .merge(curriculum::routes(state.clone()))
        .merge(assessment::routes(state.clone()))
        .merge(images::routes(state.clone()))
        .merge(mentor::routes(state.clone()))
        .merge(translations::routes(state.clone()))
        .merge(speech::routes(state.clone()))
        .merge(corpus::routes(state.clone()))
        .merge(sessions::routes(state));

    let app = Router::new().route("/health", get(health));
    if api_prefix.is_empty() {
        app.merge(api_routes)
    } else {
        app.nest(api_prefix, api_routes)
    }
}
