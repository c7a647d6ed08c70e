// Assistant service wiring the session registry and orchestrator together

use std::sync::Arc;
use std::time::Duration;

use sahayak_core::{
    AgentResponse, AgentRuntime, ConceptExplainer, ConceptExplanation, ConceptQuery, Orchestrator,
    Result, SessionRegistry,
};

pub struct AssistantService {
    registry: SessionRegistry,
    orchestrator: Orchestrator,
    explainer: ConceptExplainer,
}

impl AssistantService {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        app_name: impl Into<String>,
        registry_capacity: usize,
        agent_timeout: Duration,
    ) -> Self {
        let orchestrator = Orchestrator::new(agent_timeout);
        Self {
            registry: SessionRegistry::new(runtime, app_name, registry_capacity),
            explainer: ConceptExplainer::new(orchestrator.clone()),
            orchestrator,
        }
    }

    /// Send one turn on the (user, session) conversation thread
    pub async fn ask(
        &self,
        user_id: &str,
        session_id: &str,
        prompt: &str,
        audio: Option<Vec<u8>>,
        image: Option<Vec<u8>>,
    ) -> Result<AgentResponse> {
        let handle = self.registry.get_or_create(user_id, session_id).await?;
        self.orchestrator.send_turn(&handle, prompt, audio, image).await
    }

    /// Run the curriculum-then-web policy for a concept. Never fails:
    /// session acquisition errors degrade to the templated answer the same
    /// way a stage failure does.
    pub async fn explain_concept(
        &self,
        user_id: &str,
        session_id: &str,
        query: &ConceptQuery,
    ) -> ConceptExplanation {
        let handle = match self.registry.get_or_create(user_id, session_id).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(user_id, session_id, error = %e, "session unavailable for concept lookup");
                return ConceptExplanation::fallback(query, e.to_string());
            }
        };
        self.explainer.explain(&handle, query).await
    }

    /// Whether a conversation thread exists for the key
    pub async fn has_session(&self, user_id: &str, session_id: &str) -> bool {
        self.registry.contains(user_id, session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sahayak_core::{ExplanationSource, MockAgentRuntime};

    fn query() -> ConceptQuery {
        ConceptQuery {
            concept: "Photosynthesis".to_string(),
            grade: 6,
            language: "en".to_string(),
            curriculum_type: "ncert".to_string(),
        }
    }

    #[tokio::test]
    async fn test_registry_failure_degrades_to_fallback() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.fail_next_create("runtime down").await;
        let service =
            AssistantService::new(runtime, "sahayak", 16, Duration::from_secs(5));

        let result = service.explain_concept("t", "s-1", &query()).await;

        assert_eq!(result.source, ExplanationSource::Fallback);
        assert!(!result.curriculum_found);
        assert!(result.error.unwrap().contains("runtime down"));
    }

    #[tokio::test]
    async fn test_ask_reuses_the_session_thread() {
        let runtime = Arc::new(MockAgentRuntime::new());
        let service = AssistantService::new(
            runtime.clone(),
            "sahayak",
            16,
            Duration::from_secs(5),
        );

        service.ask("t", "s-1", "first", None, None).await.unwrap();
        service.ask("t", "s-1", "second", None, None).await.unwrap();

        assert_eq!(runtime.created_sessions().await.len(), 1);
        assert!(service.has_session("t", "s-1").await);
        assert!(!service.has_session("t", "other").await);
    }
}
