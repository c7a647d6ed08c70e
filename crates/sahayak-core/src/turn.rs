// Conversational turn types
//
// A Turn is one unit of input sent to the agent runtime. Exactly one shape
// is active per turn: text-only, audio-only, or text-plus-image. When a
// caller supplies several inputs at once, resolution order is
// audio > image > text.

use serde::{Deserialize, Serialize};

/// MIME type attached to audio turns
pub const AUDIO_WAV: &str = "audio/wav";

/// MIME type attached to image turns
pub const IMAGE_PNG: &str = "image/png";

/// Binary payload with its MIME type. Data travels base64-encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// One part of a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnPart {
    Text { text: String },
    InlineData { inline_data: Blob },
}

/// A user turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub parts: Vec<TurnPart>,
}

impl Turn {
    /// Text-only turn. The text must be non-empty; enforcement sits with the
    /// HTTP boundary, which rejects requests carrying no input at all.
    pub fn text(query: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![TurnPart::Text { text: query.into() }],
        }
    }

    /// Audio-only turn
    pub fn audio(data: Vec<u8>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![TurnPart::InlineData {
                inline_data: Blob::new(AUDIO_WAV, data),
            }],
        }
    }

    /// Text-plus-image turn. The text part is kept even when empty.
    pub fn text_with_image(query: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![
                TurnPart::Text { text: query.into() },
                TurnPart::InlineData {
                    inline_data: Blob::new(IMAGE_PNG, data),
                },
            ],
        }
    }

    /// Resolve heterogeneous input into a single turn.
    /// Precedence is audio > image > text when several inputs are supplied.
    pub fn resolve(text: &str, audio: Option<Vec<u8>>, image: Option<Vec<u8>>) -> Self {
        if let Some(audio) = audio {
            Turn::audio(audio)
        } else if let Some(image) = image {
            Turn::text_with_image(text, image)
        } else {
            Turn::text(text)
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_turn_has_exactly_one_part() {
        let turn = Turn::text("What is photosynthesis?");
        assert_eq!(turn.role, "user");
        assert_eq!(
            turn.parts,
            vec![TurnPart::Text {
                text: "What is photosynthesis?".to_string()
            }]
        );
    }

    #[test]
    fn test_audio_wins_over_image_and_text() {
        let turn = Turn::resolve("ignored", Some(vec![1, 2, 3]), Some(vec![4, 5, 6]));
        assert_eq!(turn.parts.len(), 1);
        match &turn.parts[0] {
            TurnPart::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, AUDIO_WAV);
                assert_eq!(inline_data.data, vec![1, 2, 3]);
            }
            other => panic!("expected inline data part, got {:?}", other),
        }
    }

    #[test]
    fn test_image_turn_keeps_empty_text_part() {
        let turn = Turn::resolve("", None, Some(vec![9, 9]));
        assert_eq!(turn.parts.len(), 2);
        assert_eq!(
            turn.parts[0],
            TurnPart::Text {
                text: String::new()
            }
        );
        match &turn.parts[1] {
            TurnPart::InlineData { inline_data } => assert_eq!(inline_data.mime_type, IMAGE_PNG),
            other => panic!("expected inline data part, got {:?}", other),
        }
    }

    #[test]
    fn test_wire_shape() {
        let turn = Turn::text_with_image("label this", vec![0xAB]);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["parts"][0]["text"], "label this");
        assert_eq!(json["parts"][1]["inline_data"]["mime_type"], "image/png");
        // 0xAB base64-encodes to "qw=="
        assert_eq!(json["parts"][1]["inline_data"]["data"], "qw==");
    }
}
