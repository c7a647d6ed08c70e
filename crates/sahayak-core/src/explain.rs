// Concept-explanation fallback policy
//
// Two-stage retrieval: ask the curriculum-grounded source first, fall back
// to an open-domain search only on the explicit not-found sentinel, never on
// an ambiguous answer. Failures anywhere degrade to a templated generic
// explanation - this path never hands its endpoint a hard error.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::prompts;
use crate::registry::SessionHandle;

/// Literal token the agent is instructed to emit when the curriculum has no
/// relevant material. Detection is case-sensitive substring containment.
pub const CURRICULUM_NOT_FOUND: &str = "CURRICULUM_NOT_FOUND";

/// Where the explanation text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ExplanationSource {
    CurriculumDb,
    WebSearch,
    Fallback,
}

/// Parameters of one concept-explanation request
#[derive(Debug, Clone)]
pub struct ConceptQuery {
    pub concept: String,
    pub grade: u8,
    pub language: String,
    pub curriculum_type: String,
}

/// Outcome of the fallback policy. The degraded answer is a normal variant,
/// not an error.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConceptExplanation {
    pub response: String,
    pub source: ExplanationSource,
    pub curriculum_found: bool,
    /// Diagnostic description of the error that forced the templated answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConceptExplanation {
    /// Templated generic answer used when retrieval is unavailable
    pub fn fallback(query: &ConceptQuery, error: impl Into<String>) -> Self {
        Self {
            response: prompts::generic_explanation(query),
            source: ExplanationSource::Fallback,
            curriculum_found: false,
            error: Some(error.into()),
        }
    }
}

/// Executes the curriculum-then-web retrieval policy
#[derive(Debug, Clone)]
pub struct ConceptExplainer {
    orchestrator: Orchestrator,
}

impl ConceptExplainer {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    /// Explain a concept for the given grade and curriculum. Infallible:
    /// retrieval errors are converted into the templated fallback answer.
    pub async fn explain(&self, handle: &SessionHandle, query: &ConceptQuery) -> ConceptExplanation {
        match self.run_stages(handle, query).await {
            Ok(explanation) => explanation,
            Err(e) => {
                tracing::error!(
                    concept = %query.concept,
                    grade = query.grade,
                    error = %e,
                    "concept lookup failed; returning templated explanation"
                );
                ConceptExplanation::fallback(query, e.to_string())
            }
        }
    }

    async fn run_stages(
        &self,
        handle: &SessionHandle,
        query: &ConceptQuery,
    ) -> Result<ConceptExplanation> {
        let lookup = prompts::curriculum_lookup_prompt(query);
        let curriculum = self.orchestrator.send_turn(handle, &lookup, None, None).await?;

        if !curriculum.text.contains(CURRICULUM_NOT_FOUND) {
            return Ok(ConceptExplanation {
                response: curriculum.text,
                source: ExplanationSource::CurriculumDb,
                curriculum_found: true,
                error: None,
            });
        }

        let search = prompts::web_search_prompt(query);
        let web = self.orchestrator.send_turn(handle, &search, None, None).await?;
        Ok(ConceptExplanation {
            response: web.text,
            source: ExplanationSource::WebSearch,
            curriculum_found: false,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MockAgentRuntime, ScriptedTurn};
    use crate::registry::SessionRegistry;
    use crate::runtime::AgentRuntime;
    use std::sync::Arc;

    fn query(concept: &str, grade: u8) -> ConceptQuery {
        ConceptQuery {
            concept: concept.to_string(),
            grade,
            language: "en".to_string(),
            curriculum_type: "ncert".to_string(),
        }
    }

    async fn explain_with(
        runtime: Arc<dyn AgentRuntime>,
        query: &ConceptQuery,
    ) -> ConceptExplanation {
        let registry = SessionRegistry::new(Arc::clone(&runtime), "sahayak", 16);
        let handle = registry.get_or_create("teacher-1", "s-1").await.unwrap();
        ConceptExplainer::new(Orchestrator::default())
            .explain(&handle, query)
            .await
    }

    #[tokio::test]
    async fn test_curriculum_hit_terminates_first_stage() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::text(
                "Found in chapter 4: plants convert light into energy.",
            ))
            .await;

        let result = explain_with(runtime.clone(), &query("Photosynthesis", 6)).await;

        assert_eq!(result.source, ExplanationSource::CurriculumDb);
        assert!(result.curriculum_found);
        assert!(result.response.contains("chapter 4"));
        assert!(result.error.is_none());
        // Only the lookup stage ran.
        assert_eq!(runtime.run_prompts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sentinel_triggers_web_stage() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::text("CURRICULUM_NOT_FOUND"))
            .await;
        runtime
            .add_response(ScriptedTurn::text(
                "📚 **Curriculum Note**: The requested topic 'Quantum Entanglement' was not found in Grade 3 NCERT curriculum. Below is a custom explanation tailored for your grade level. Two particles...",
            ))
            .await;

        let result = explain_with(runtime.clone(), &query("Quantum Entanglement", 3)).await;

        assert_eq!(result.source, ExplanationSource::WebSearch);
        assert!(!result.curriculum_found);
        assert!(result.response.starts_with("📚 **Curriculum Note**"));

        let prompts = runtime.run_prompts().await;
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("search the web"));
    }

    #[tokio::test]
    async fn test_sentinel_embedded_in_longer_text_still_triggers() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::text(
                "I searched thoroughly. CURRICULUM_NOT_FOUND. Let me look elsewhere.",
            ))
            .await;
        runtime.add_response(ScriptedTurn::text("web answer")).await;

        let result = explain_with(runtime, &query("Tensors", 5)).await;
        assert_eq!(result.source, ExplanationSource::WebSearch);
    }

    #[tokio::test]
    async fn test_runtime_failure_yields_templated_fallback() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.fail_runs("agent unreachable").await;

        let result = explain_with(runtime, &query("Photosynthesis", 6)).await;

        assert_eq!(result.source, ExplanationSource::Fallback);
        assert!(!result.curriculum_found);
        assert!(result.response.contains("Photosynthesis"));
        assert!(result.response.contains("Grade 6"));
        assert!(result.error.unwrap().contains("agent unreachable"));
    }

    #[test]
    fn test_sources_serialize_snake_case() {
        assert_eq!(
            serde_json::to_value(ExplanationSource::CurriculumDb).unwrap(),
            "curriculum_db"
        );
        assert_eq!(
            serde_json::to_value(ExplanationSource::WebSearch).unwrap(),
            "web_search"
        );
        assert_eq!(
            serde_json::to_value(ExplanationSource::Fallback).unwrap(),
            "fallback"
        );
    }
}
