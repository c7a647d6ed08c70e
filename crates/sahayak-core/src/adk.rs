// HTTP agent runtime driver
//
// Drives an ADK-style agent API server: sessions are registered with a REST
// call, turns are invoked through a server-sent-event endpoint, and
// artifacts are fetched per session. The server's event records are mapped
// into the typed AgentEvent enum at the wire boundary.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::event::{AgentEvent, Artifact, ContentPart};
use crate::runtime::{AgentEventStream, AgentRuntime};
use crate::turn::Turn;

/// Agent runtime reached over HTTP
///
/// # Example
///
/// ```ignore
/// use sahayak_core::HttpAgentRuntime;
///
/// let runtime = HttpAgentRuntime::new("http://localhost:8080", "sahayak");
/// // or
/// let runtime = HttpAgentRuntime::from_env()?;
/// ```
#[derive(Clone)]
pub struct HttpAgentRuntime {
    client: Client,
    base_url: String,
    app_name: String,
}

impl HttpAgentRuntime {
    pub fn new(base_url: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            app_name: app_name.into(),
        }
    }

    /// Create a driver from AGENT_RUNTIME_URL and AGENT_APP_NAME
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("AGENT_RUNTIME_URL")
            .map_err(|_| AgentError::session_init("AGENT_RUNTIME_URL environment variable not set"))?;
        let app_name =
            std::env::var("AGENT_APP_NAME").unwrap_or_else(|_| "sahayak".to_string());
        Ok(Self::new(base_url, app_name))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn session_url(&self, app_name: &str, user_id: &str, session_id: &str) -> String {
        format!(
            "{}/apps/{}/users/{}/sessions/{}",
            self.base_url, app_name, user_id, session_id
        )
    }
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    app_name: &'a str,
    user_id: &'a str,
    session_id: &'a str,
    new_message: Turn,
    streaming: bool,
}

#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    partial: Option<bool>,
    #[serde(default)]
    actions: Option<WireActions>,
    #[serde(default, alias = "errorMessage")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
struct WirePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireActions {
    #[serde(default)]
    escalate: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct WireArtifact {
    #[serde(alias = "inlineData")]
    inline_data: Option<WireBlob>,
}

#[derive(Debug, Deserialize)]
struct WireBlob {
    data: String,
}

/// Map one wire event record to the typed event enum.
/// Escalation takes precedence over content; a record that is neither
/// partial nor escalated is the terminal answer.
fn parse_event(data: &str) -> Result<AgentEvent> {
    let event: WireEvent = serde_json::from_str(data)
        .map_err(|e| AgentError::invocation(format!("Failed to parse event: {e}")))?;

    if event
        .actions
        .as_ref()
        .and_then(|actions| actions.escalate)
        .unwrap_or(false)
    {
        return Ok(AgentEvent::Escalated {
            message: event.error_message,
        });
    }

    let texts: Vec<ContentPart> = event
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .map(ContentPart::new)
                .collect()
        })
        .unwrap_or_default();

    if event.partial.unwrap_or(false) {
        let text = texts.first().map(|part| part.text.clone()).unwrap_or_default();
        Ok(AgentEvent::Delta { text })
    } else {
        Ok(AgentEvent::Final { parts: texts })
    }
}

#[async_trait]
impl AgentRuntime for HttpAgentRuntime {
    async fn create_session(&self, app_name: &str, user_id: &str, session_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.session_url(app_name, user_id, session_id))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| AgentError::session_init(format!("Failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::session_init(format!(
                "Runtime rejected session creation ({status}): {body}"
            )));
        }
        Ok(())
    }

    async fn run(&self, user_id: &str, session_id: &str, turn: Turn) -> Result<AgentEventStream> {
        let request = RunRequest {
            app_name: &self.app_name,
            user_id,
            session_id,
            new_message: turn,
            streaming: true,
        };

        let response = self
            .client
            .post(format!("{}/run_sse", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AgentError::invocation(format!("Failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::invocation(format!(
                "Runtime error ({status}): {body}"
            )));
        }

        let events = response
            .bytes_stream()
            .eventsource()
            .filter_map(|result| async move {
                match result {
                    Ok(event) if event.data.is_empty() => None,
                    Ok(event) => Some(parse_event(&event.data)),
                    Err(e) => Some(Err(AgentError::invocation(format!("Stream error: {e}")))),
                }
            });

        Ok(Box::pin(events))
    }

    async fn list_artifacts(&self, user_id: &str, session_id: &str) -> Result<Vec<Artifact>> {
        let base = self.session_url(&self.app_name, user_id, session_id);

        let names: Vec<String> = self
            .client
            .get(format!("{base}/artifacts"))
            .send()
            .await
            .map_err(|e| AgentError::artifact(format!("Failed to send request: {e}")))?
            .error_for_status()
            .map_err(|e| AgentError::artifact(format!("Artifact listing failed: {e}")))?
            .json()
            .await
            .map_err(|e| AgentError::artifact(format!("Failed to parse listing: {e}")))?;

        let mut artifacts = Vec::with_capacity(names.len());
        for name in names {
            let wire: WireArtifact = self
                .client
                .get(format!("{base}/artifacts/{name}"))
                .send()
                .await
                .map_err(|e| AgentError::artifact(format!("Failed to send request: {e}")))?
                .error_for_status()
                .map_err(|e| AgentError::artifact(format!("Artifact fetch failed: {e}")))?
                .json()
                .await
                .map_err(|e| AgentError::artifact(format!("Failed to parse artifact: {e}")))?;

            let Some(blob) = wire.inline_data else {
                continue;
            };
            let data = STANDARD
                .decode(blob.data.as_bytes())
                .map_err(|e| AgentError::artifact(format!("Invalid artifact encoding: {e}")))?;
            artifacts.push(Artifact::new(name, data));
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_partial_event() {
        let event = parse_event(r#"{"content":{"parts":[{"text":"thinking"}]},"partial":true}"#)
            .unwrap();
        assert_eq!(
            event,
            AgentEvent::Delta {
                text: "thinking".to_string()
            }
        );
    }

    #[test]
    fn test_parse_final_event() {
        let event =
            parse_event(r#"{"content":{"parts":[{"text":"answer"},{"text":"extra"}]}}"#).unwrap();
        assert_eq!(
            event,
            AgentEvent::Final {
                parts: vec![ContentPart::new("answer"), ContentPart::new("extra")]
            }
        );
    }

    #[test]
    fn test_parse_escalation_takes_precedence() {
        let event = parse_event(
            r#"{"content":{"parts":[{"text":"partial answer"}]},"actions":{"escalate":true},"error_message":"safety stop"}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            AgentEvent::Escalated {
                message: Some("safety stop".to_string())
            }
        );
    }

    #[test]
    fn test_parse_event_rejects_garbage() {
        assert!(parse_event("not json").is_err());
    }

    #[tokio::test]
    async fn test_create_session_posts_to_session_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/apps/sahayak/users/teacher-1/sessions/s-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let runtime = HttpAgentRuntime::new(server.uri(), "sahayak");
        runtime
            .create_session("sahayak", "teacher-1", "s-1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_session_failure_maps_to_session_init() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let runtime = HttpAgentRuntime::new(server.uri(), "sahayak");
        let err = runtime
            .create_session("sahayak", "teacher-1", "s-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::SessionInit(_)));
    }

    #[tokio::test]
    async fn test_run_streams_typed_events() {
        let server = MockServer::start().await;
        let sse_body = concat!(
            "data: {\"content\":{\"parts\":[{\"text\":\"Hel\"}]},\"partial\":true}\n\n",
            "data: {\"content\":{\"parts\":[{\"text\":\"Hello teacher\"}]}}\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/run_sse"))
            .and(body_partial_json(serde_json::json!({
                "app_name": "sahayak",
                "user_id": "teacher-1",
                "session_id": "s-1",
                "streaming": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"))
            .mount(&server)
            .await;

        let runtime = HttpAgentRuntime::new(server.uri(), "sahayak");
        let events: Vec<_> = runtime
            .run("teacher-1", "s-1", Turn::text("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        let events: Vec<_> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            events,
            vec![
                AgentEvent::Delta {
                    text: "Hel".to_string()
                },
                AgentEvent::Final {
                    parts: vec![ContentPart::new("Hello teacher")]
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_artifacts_fetches_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apps/sahayak/users/teacher-1/sessions/s-1/artifacts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["generated_image_001.png"])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(
                "/apps/sahayak/users/teacher-1/sessions/s-1/artifacts/generated_image_001.png",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "inline_data": {"mime_type": "image/png", "data": STANDARD.encode([7u8, 8, 9])}
            })))
            .mount(&server)
            .await;

        let runtime = HttpAgentRuntime::new(server.uri(), "sahayak");
        let artifacts = runtime.list_artifacts("teacher-1", "s-1").await.unwrap();
        assert_eq!(
            artifacts,
            vec![Artifact::new("generated_image_001.png", vec![7, 8, 9])]
        );
    }

    #[tokio::test]
    async fn test_list_artifacts_failure_maps_to_artifact_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let runtime = HttpAgentRuntime::new(server.uri(), "sahayak");
        let err = runtime.list_artifacts("teacher-1", "s-1").await.unwrap_err();
        assert!(matches!(err, AgentError::ArtifactLookup(_)));
    }
}
