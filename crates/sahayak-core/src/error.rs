// Error types for the orchestration core

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that can occur while driving the agent runtime
#[derive(Debug, Error)]
pub enum AgentError {
    /// Runtime session registration failed; fatal for the call, not retried
    #[error("Session init error: {0}")]
    SessionInit(String),

    /// Runtime invocation failed mid-turn
    #[error("Invocation error: {0}")]
    Invocation(String),

    /// Artifact listing failed; callers treat this as "no image produced"
    #[error("Artifact lookup error: {0}")]
    ArtifactLookup(String),

    /// The runtime call or event drain exceeded the configured deadline
    #[error("Agent call timed out after {0}s")]
    Timeout(u64),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AgentError {
    /// Create a session init error
    pub fn session_init(msg: impl Into<String>) -> Self {
        AgentError::SessionInit(msg.into())
    }

    /// Create an invocation error
    pub fn invocation(msg: impl Into<String>) -> Self {
        AgentError::Invocation(msg.into())
    }

    /// Create an artifact lookup error
    pub fn artifact(msg: impl Into<String>) -> Self {
        AgentError::ArtifactLookup(msg.into())
    }
}
