// Common DTOs and helpers for the public API

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use utoipa::ToSchema;

/// Response shape shared by the prompt-driven generation endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromptResponse {
    /// Agent-produced text
    pub response: String,
    /// Session the turn ran on
    pub session_id: String,
}

/// Default user identity for requests that do not carry one
pub fn default_user() -> String {
    "default_user".to_string()
}

/// Default UI language
pub fn default_language() -> String {
    "en".to_string()
}

/// Default curriculum source
pub fn default_curriculum() -> String {
    "ncert".to_string()
}

/// Inline data URI for generated PNG bytes
pub fn image_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_uri() {
        assert_eq!(image_data_uri(&[0xAB]), "data:image/png;base64,qw==");
    }
}
