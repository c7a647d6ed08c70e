// Speech synthesis service
//
// Thin client over an external text-to-speech endpoint returning MP3 audio.

use anyhow::{Context, Result};
use reqwest::Client;

pub struct SpeechService {
    client: Client,
    base_url: Option<String>,
}

impl SpeechService {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Synthesize speech for the given text, returning MP3 bytes
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let base = self
            .base_url
            .as_ref()
            .context("speech synthesis not configured (TTS_API_URL not set)")?;

        let audio = self
            .client
            .post(format!("{base}/synthesize"))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .context("Failed to reach speech synthesis service")?
            .error_for_status()
            .context("Speech synthesis service returned an error")?
            .bytes()
            .await
            .context("Failed to read synthesized audio")?;

        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/synthesize"))
            .and(body_json(serde_json::json!({"text": "Good morning class"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0x49, 0x44, 0x33], "audio/mpeg"),
            )
            .mount(&server)
            .await;

        let service = SpeechService::new(Some(server.uri()));
        let audio = service.synthesize("Good morning class").await.unwrap();
        assert_eq!(audio, vec![0x49, 0x44, 0x33]);
    }

    #[tokio::test]
    async fn test_unconfigured_service_errors() {
        let service = SpeechService::new(None);
        let err = service.synthesize("hello").await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
