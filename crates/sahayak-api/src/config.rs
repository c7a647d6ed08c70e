// API configuration loaded from the environment

use std::str::FromStr;
use std::time::Duration;

/// Server configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address to bind, e.g. "0.0.0.0:8000"
    pub bind_addr: String,
    /// Optional route prefix, e.g. "/api"
    pub api_prefix: String,
    /// Allowed CORS origins; empty means same-origin only
    pub cors_origins: Vec<String>,
    /// Base URL of the agent runtime API server
    pub runtime_url: String,
    /// Application namespace sessions are registered under
    pub app_name: String,
    /// Maximum live session handles before LRU eviction
    pub registry_capacity: usize,
    /// Deadline for one runtime call including event draining
    pub agent_timeout: Duration,
    /// Remote translation service; fallback tables are used when unset
    pub translate_url: Option<String>,
    /// Speech synthesis service; the endpoint fails when unset
    pub tts_url: Option<String>,
    /// Corpus catalog service; book listing fails in-band when unset
    pub corpus_url: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_or("SAHAYAK_BIND_ADDR", "0.0.0.0:8000"),
            api_prefix: std::env::var("API_PREFIX").unwrap_or_default(),
            cors_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|value| !value.is_empty())
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            runtime_url: env_or("AGENT_RUNTIME_URL", "http://localhost:8080"),
            app_name: env_or("AGENT_APP_NAME", "sahayak"),
            registry_capacity: parse_env("SESSION_REGISTRY_CAPACITY", 1024),
            agent_timeout: Duration::from_secs(parse_env("AGENT_TIMEOUT_SECS", 120)),
            translate_url: optional_env("TRANSLATE_API_URL"),
            tts_url: optional_env("TTS_API_URL"),
            corpus_url: optional_env("CORPUS_API_URL"),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
