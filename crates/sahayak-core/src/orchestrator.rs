// Request orchestration
//
// Normalizes heterogeneous input into a single turn, invokes the runtime
// through a session handle, drains the event stream up to the first terminal
// event, and extracts the final text plus an optional generated image.

use futures::StreamExt;
use std::time::Duration;

use crate::error::{AgentError, Result};
use crate::event::AgentEvent;
use crate::registry::SessionHandle;
use crate::turn::Turn;

/// Sentinel text used when the stream ends without a terminal event
pub const NO_FINAL_RESPONSE: &str = "Agent did not produce a final response.";

/// Substring marking a runtime artifact as the generated image for a turn
const GENERATED_IMAGE_MARKER: &str = "generated_image";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Final result of one orchestrated turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentResponse {
    pub text: String,
    /// Raw PNG bytes when the runtime recorded a generated image
    pub image: Option<Vec<u8>>,
}

/// Drives one turn against the runtime with a bounded deadline
#[derive(Debug, Clone)]
pub struct Orchestrator {
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Send one turn on the session and extract the terminal response.
    /// Modality precedence is audio > image > text when several are supplied.
    /// Invocation failures and timeouts propagate; artifact lookup failures
    /// only cost the optional image.
    pub async fn send_turn(
        &self,
        handle: &SessionHandle,
        text: &str,
        audio: Option<Vec<u8>>,
        image: Option<Vec<u8>>,
    ) -> Result<AgentResponse> {
        let turn = Turn::resolve(text, audio, image);

        let text = tokio::time::timeout(self.timeout, self.drain(handle, turn))
            .await
            .map_err(|_| AgentError::Timeout(self.timeout.as_secs()))??;

        let image = match tokio::time::timeout(self.timeout, handle.list_artifacts()).await {
            Ok(Ok(artifacts)) => artifacts
                .into_iter()
                .find(|artifact| artifact.name.contains(GENERATED_IMAGE_MARKER))
                .map(|artifact| artifact.data),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "artifact listing failed; continuing without image");
                None
            }
            Err(_) => {
                tracing::warn!("artifact listing timed out; continuing without image");
                None
            }
        };

        Ok(AgentResponse { text, image })
    }

    /// Consume events until the first terminal one. Later events are never read.
    async fn drain(&self, handle: &SessionHandle, turn: Turn) -> Result<String> {
        let mut events = handle.run(turn).await?;

        let mut text = NO_FINAL_RESPONSE.to_string();
        while let Some(event) = events.next().await {
            match event? {
                AgentEvent::Delta { .. } => continue,
                AgentEvent::Final { parts } => {
                    if let Some(part) = parts.first() {
                        text = part.text.clone();
                    }
                    break;
                }
                AgentEvent::Escalated { message } => {
                    let message = message.unwrap_or_else(|| "No specific message.".to_string());
                    text = format!("Agent escalated: {message}");
                    break;
                }
            }
        }
        Ok(text)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Artifact, ContentPart};
    use crate::memory::{MockAgentRuntime, ScriptedTurn};
    use crate::registry::SessionRegistry;
    use std::sync::Arc;

    async fn handle_for(runtime: Arc<MockAgentRuntime>) -> Arc<crate::registry::SessionHandle> {
        let registry = SessionRegistry::new(runtime, "sahayak", 16);
        registry.get_or_create("teacher-1", "s-1").await.unwrap()
    }

    #[tokio::test]
    async fn test_final_event_text_wins() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::events(vec![
                AgentEvent::Delta {
                    text: "working".to_string(),
                },
                AgentEvent::Final {
                    parts: vec![ContentPart::new("Hello teacher")],
                },
                // Anything after the terminal event must never be consulted.
                AgentEvent::Final {
                    parts: vec![ContentPart::new("MUST NOT BE READ")],
                },
            ]))
            .await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, "Hello teacher");
        assert_eq!(response.image, None);
    }

    #[tokio::test]
    async fn test_stream_without_terminal_event_keeps_sentinel() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::events(vec![AgentEvent::Delta {
                text: "partial".to_string(),
            }]))
            .await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, NO_FINAL_RESPONSE);
    }

    #[tokio::test]
    async fn test_final_event_without_parts_keeps_sentinel() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::events(vec![AgentEvent::Final {
                parts: vec![],
            }]))
            .await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, NO_FINAL_RESPONSE);
    }

    #[tokio::test]
    async fn test_escalation_with_message() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime
            .add_response(ScriptedTurn::escalated(Some("quota exhausted")))
            .await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, "Agent escalated: quota exhausted");
    }

    #[tokio::test]
    async fn test_escalation_without_message() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.add_response(ScriptedTurn::escalated(None)).await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, "Agent escalated: No specific message.");
    }

    #[tokio::test]
    async fn test_generated_image_extracted_by_name_marker() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.add_response(ScriptedTurn::text("Here you go")).await;
        runtime
            .set_artifacts(vec![
                Artifact::new("draft.txt", vec![1]),
                Artifact::new("generated_image_001.png", vec![7, 7, 7]),
                Artifact::new("generated_image_002.png", vec![9]),
            ])
            .await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "draw", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, "Here you go");
        // First match in listing order wins.
        assert_eq!(response.image, Some(vec![7, 7, 7]));
    }

    #[tokio::test]
    async fn test_artifact_failure_is_absorbed() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.add_response(ScriptedTurn::text("text intact")).await;
        runtime.fail_artifacts("listing unavailable").await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let response = Orchestrator::default()
            .send_turn(&handle, "draw", None, None)
            .await
            .unwrap();
        assert_eq!(response.text, "text intact");
        assert_eq!(response.image, None);
    }

    #[tokio::test]
    async fn test_invocation_error_propagates() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.fail_runs("connection refused").await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let err = Orchestrator::default()
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Invocation(_)));
    }

    #[tokio::test]
    async fn test_hung_runtime_maps_to_timeout() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.hang_runs().await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        let err = Orchestrator::new(Duration::from_millis(50))
            .send_turn(&handle, "hi", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_audio_precedence_reaches_runtime() {
        let runtime = Arc::new(MockAgentRuntime::new());
        runtime.add_response(ScriptedTurn::text("heard you")).await;
        let handle = handle_for(Arc::clone(&runtime)).await;

        Orchestrator::default()
            .send_turn(&handle, "ignored", Some(vec![1, 2]), Some(vec![3, 4]))
            .await
            .unwrap();

        let turns = runtime.run_turns().await;
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0], Turn::audio(vec![1, 2]));
    }
}
