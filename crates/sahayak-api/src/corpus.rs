// Corpus introspection routes: available books and static NCERT resources

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Books available in the corpus for one curriculum and grade
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CorpusBooksResponse {
    /// Unique subject names, sorted
    pub books: Vec<String>,
    /// Present when the corpus could not be listed; `books` is empty then
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query for NCERT resource listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResourcesQuery {
    pub grade: u8,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResourceEntry {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResourcesResponse {
    pub grade: u8,
    pub subject: Option<String>,
    pub resources: Vec<ResourceEntry>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/corpus/books/:curriculum/:grade", get(list_corpus_books))
        .route("/ncert/resources", get(ncert_resources))
        .with_state(state)
}

/// GET /api/corpus/books/{curriculum}/{grade} - Subjects with corpus books
///
/// Listing failures are reported in-band: an empty book list plus an error
/// description, so the UI can degrade instead of breaking.
#[utoipa::path(
    get,
    path = "/api/corpus/books/{curriculum}/{grade}",
    params(
        ("curriculum" = String, Path, description = "Curriculum type (ncert, kts)"),
        ("grade" = u8, Path, description = "Grade level")
    ),
    responses(
        (status = 200, description = "Available subjects", body = CorpusBooksResponse)
    ),
    tag = "corpus"
)]
pub async fn list_corpus_books(
    State(state): State<AppState>,
    Path((curriculum, grade)): Path<(String, u8)>,
) -> Json<CorpusBooksResponse> {
    match state.corpus.list_books(&curriculum, grade).await {
        Ok(books) => Json(CorpusBooksResponse { books, error: None }),
        Err(e) => {
            tracing::error!(curriculum = %curriculum, grade, "Failed to list corpus books: {}", e);
            Json(CorpusBooksResponse {
                books: Vec::new(),
                error: Some(e.to_string()),
            })
        }
    }
}

/// GET /ncert/resources - Static NCERT resource listing for a grade/subject
#[utoipa::path(
    get,
    path = "/ncert/resources",
    params(ResourcesQuery),
    responses(
        (status = 200, description = "Available NCERT resources", body = ResourcesResponse)
    ),
    tag = "corpus"
)]
pub async fn ncert_resources(Query(query): Query<ResourcesQuery>) -> Json<ResourcesResponse> {
    let subject_label = query.subject.clone().unwrap_or_else(|| "General".to_string());
    let subject_slug = query
        .subject
        .clone()
        .unwrap_or_else(|| "general".to_string())
        .to_lowercase();

    let resources = vec![
        ResourceEntry {
            resource_type: "textbook",
            name: format!("NCERT {} Class {}", subject_label, query.grade),
            url: format!("/assets/ncert-books/grade-{}-{}-en.pdf", query.grade, subject_slug),
        },
        ResourceEntry {
            resource_type: "supplementary",
            name: format!("NCERT Supplementary Material Grade {}", query.grade),
            url: format!("/assets/ncert-books/grade-{}-supplementary-en.pdf", query.grade),
        },
    ];

    Json(ResourcesResponse {
        grade: query.grade,
        subject: query.subject,
        resources,
    })
}
