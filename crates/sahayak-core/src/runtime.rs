// Agent runtime trait
//
// The agent runtime is an opaque external capability: given a conversation
// turn it produces a stream of events ending in a terminal one, and it may
// record binary artifacts (generated images) for the session.
//
// Implementations:
// - HttpAgentRuntime: drives an ADK-style agent API server over HTTP/SSE
// - MockAgentRuntime: scripted in-memory implementation for tests

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use crate::event::{AgentEvent, Artifact};
use crate::turn::Turn;

/// Type alias for the agent event stream
pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent>> + Send>>;

/// External agent capability
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Register a session with the runtime's session tracking.
    /// Called exactly once per session key, before the first turn.
    async fn create_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()>;

    /// Send one turn on an existing session and stream back events.
    async fn run(&self, user_id: &str, session_id: &str, turn: Turn) -> Result<AgentEventStream>;

    /// List artifacts the runtime recorded for a session, in listing order.
    async fn list_artifacts(&self, user_id: &str, session_id: &str) -> Result<Vec<Artifact>>;
}
