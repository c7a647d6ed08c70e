// Sahayak Core
//
// Runtime-agnostic building blocks for the Sahayak teaching assistant
// backend. The external agent runtime is treated as an opaque capability
// behind the AgentRuntime trait; everything above it is plain orchestration.
//
// Key design decisions:
// - The session registry is bounded (LRU) and creation is single-flight per key
// - Agent events are a typed enum consumed through an async stream
// - Runtime calls and event draining run under one configurable deadline
// - The concept-explanation policy returns a plain value; the degraded
//   templated answer is a normal variant, not a caught error

pub mod adk;
pub mod error;
pub mod event;
pub mod explain;
pub mod orchestrator;
pub mod prompts;
pub mod registry;
pub mod runtime;
pub mod turn;

// In-memory implementation for examples and testing
pub mod memory;

// Re-exports for convenience
pub use adk::HttpAgentRuntime;
pub use error::{AgentError, Result};
pub use event::{AgentEvent, Artifact, ContentPart};
pub use explain::{
    ConceptExplainer, ConceptExplanation, ConceptQuery, ExplanationSource, CURRICULUM_NOT_FOUND,
};
pub use memory::{MockAgentRuntime, ScriptedTurn};
pub use orchestrator::{AgentResponse, Orchestrator, NO_FINAL_RESPONSE};
pub use registry::{SessionHandle, SessionKey, SessionRegistry};
pub use runtime::{AgentEventStream, AgentRuntime};
pub use turn::{Blob, Turn, TurnPart, AUDIO_WAV, IMAGE_PNG};
