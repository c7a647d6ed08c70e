// In-memory runtime for examples and testing
//
// Scripted AgentRuntime implementation: responses are served in order, every
// call is logged, and failures can be injected per operation.

use async_trait::async_trait;
use futures::stream;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::{AgentError, Result};
use crate::event::{AgentEvent, Artifact, ContentPart};
use crate::runtime::{AgentEventStream, AgentRuntime};
use crate::turn::{Turn, TurnPart};

/// One scripted reply: the full event sequence for a single turn
#[derive(Debug, Clone)]
pub struct ScriptedTurn {
    pub events: Vec<AgentEvent>,
}

impl ScriptedTurn {
    /// A turn ending in a final event with one text part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            events: vec![AgentEvent::Final {
                parts: vec![ContentPart::new(text)],
            }],
        }
    }

    /// A turn ending in an escalation
    pub fn escalated(message: Option<&str>) -> Self {
        Self {
            events: vec![AgentEvent::Escalated {
                message: message.map(str::to_string),
            }],
        }
    }

    /// A turn with an explicit event sequence
    pub fn events(events: Vec<AgentEvent>) -> Self {
        Self { events }
    }
}

/// Scripted in-memory agent runtime
#[derive(Default)]
pub struct MockAgentRuntime {
    responses: RwLock<Vec<ScriptedTurn>>,
    call_index: RwLock<usize>,
    run_log: RwLock<Vec<Turn>>,
    created: RwLock<Vec<(String, String, String)>>,
    artifacts: RwLock<Vec<Artifact>>,
    create_delay: Option<Duration>,
    next_create_error: RwLock<Option<String>>,
    run_error: RwLock<Option<String>>,
    artifact_error: RwLock<Option<String>>,
    hang: RwLock<bool>,
}

impl MockAgentRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay session creation, for exercising concurrent first requests
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Queue one scripted reply
    pub async fn add_response(&self, response: ScriptedTurn) {
        self.responses.write().await.push(response);
    }

    /// Replace all scripted replies
    pub async fn set_responses(&self, responses: Vec<ScriptedTurn>) {
        *self.responses.write().await = responses;
        *self.call_index.write().await = 0;
    }

    /// Artifacts returned by `list_artifacts`, in listing order
    pub async fn set_artifacts(&self, artifacts: Vec<Artifact>) {
        *self.artifacts.write().await = artifacts;
    }

    /// Fail the next `create_session` call with the given message
    pub async fn fail_next_create(&self, message: impl Into<String>) {
        *self.next_create_error.write().await = Some(message.into());
    }

    /// Fail every `run` call with the given message
    pub async fn fail_runs(&self, message: impl Into<String>) {
        *self.run_error.write().await = Some(message.into());
    }

    /// Fail every `list_artifacts` call with the given message
    pub async fn fail_artifacts(&self, message: impl Into<String>) {
        *self.artifact_error.write().await = Some(message.into());
    }

    /// Make `run` return a stream that never yields
    pub async fn hang_runs(&self) {
        *self.hang.write().await = true;
    }

    /// (app_name, user_id, session_id) triples seen by `create_session`
    pub async fn created_sessions(&self) -> Vec<(String, String, String)> {
        self.created.read().await.clone()
    }

    /// Turns seen by `run`, in call order
    pub async fn run_turns(&self) -> Vec<Turn> {
        self.run_log.read().await.clone()
    }

    /// First text part of each turn seen by `run`
    pub async fn run_prompts(&self) -> Vec<String> {
        self.run_log
            .read()
            .await
            .iter()
            .map(|turn| {
                turn.parts
                    .iter()
                    .find_map(|part| match part {
                        TurnPart::Text { text } => Some(text.clone()),
                        TurnPart::InlineData { .. } => None,
                    })
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[async_trait]
impl AgentRuntime for MockAgentRuntime {
    async fn create_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()> {
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.next_create_error.write().await.take() {
            return Err(AgentError::session_init(message));
        }
        self.created.write().await.push((
            app_name.to_string(),
            user_id.to_string(),
            session_id.to_string(),
        ));
        Ok(())
    }

    async fn run(&self, _user_id: &str, _session_id: &str, turn: Turn) -> Result<AgentEventStream> {
        if let Some(message) = self.run_error.read().await.clone() {
            return Err(AgentError::invocation(message));
        }
        self.run_log.write().await.push(turn);

        if *self.hang.read().await {
            return Ok(Box::pin(stream::pending::<Result<AgentEvent>>()));
        }

        let mut index = self.call_index.write().await;
        let responses = self.responses.read().await;
        let scripted = responses.get(*index).cloned().unwrap_or_else(|| {
            ScriptedTurn::text("Mock agent response (no more responses configured)")
        });
        *index += 1;

        Ok(Box::pin(stream::iter(
            scripted
                .events
                .into_iter()
                .map(Ok::<_, AgentError>)
                .collect::<Vec<_>>(),
        )))
    }

    async fn list_artifacts(&self, _user_id: &str, _session_id: &str) -> Result<Vec<Artifact>> {
        if let Some(message) = self.artifact_error.read().await.clone() {
            return Err(AgentError::artifact(message));
        }
        Ok(self.artifacts.read().await.clone())
    }
}
