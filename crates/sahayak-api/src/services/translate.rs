// UI translation service
//
// Best-effort by design: a remote translator is used when configured,
// otherwise static fallback tables cover the UI strings for Hindi and
// Kannada. Any failure degrades to the input text, never to an error.

use anyhow::Context;
use reqwest::Client;
use std::collections::BTreeMap;

/// Languages whose replies get rewritten when the agent answered in English
const INDIC_LANGUAGES: &[&str] = &[
    "hi", "kn", "te", "ta", "ml", "bn", "gu", "mr", "pa", "or", "as",
];

pub struct TranslationService {
    client: Client,
    base_url: Option<String>,
}

impl TranslationService {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Whether a remote translator is configured
    pub fn remote_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Translate one text. Remote service when configured, static fallback
    /// table otherwise; failures return the input unchanged.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        if text.is_empty() || source == target {
            return text.to_string();
        }
        match &self.base_url {
            Some(base) => match self.translate_remote(base, text, source, target).await {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!(target, error = %e, "translation failed; returning original text");
                    text.to_string()
                }
            },
            None => fallback_translation(text, target)
                .unwrap_or(text)
                .to_string(),
        }
    }

    /// Translate several texts in request order
    pub async fn translate_batch(&self, texts: &[String], source: &str, target: &str) -> Vec<String> {
        let mut translated = Vec::with_capacity(texts.len());
        for text in texts {
            translated.push(self.translate(text, source, target).await);
        }
        translated
    }

    /// The full UI-string table in the requested language. English values
    /// pass through; other languages are translated remotely when possible,
    /// from the fallback tables otherwise, defaulting to English.
    pub async fn ui_translations(&self, language: &str) -> BTreeMap<String, String> {
        let mut translations = BTreeMap::new();
        for (key, english) in ui_strings() {
            let value = if language == "en" {
                (*english).to_string()
            } else if self.remote_enabled() {
                self.translate(english, "en", language).await
            } else {
                fallback_translation(key, language)
                    .unwrap_or(english)
                    .to_string()
            };
            translations.insert((*key).to_string(), value);
        }
        translations
    }

    /// Post-process an agent reply that should be in `language` but looks
    /// like it came back in English. Only Indic targets are rewritten, and
    /// only when a remote translator is available.
    pub async fn ensure_language(&self, text: &str, language: &str) -> String {
        if language == "en" || !self.remote_enabled() {
            return text.to_string();
        }
        let looks_english = text.chars().any(|c| c.is_ascii_alphabetic());
        if looks_english && INDIC_LANGUAGES.contains(&language) {
            self.translate(text, "en", language).await
        } else {
            text.to_string()
        }
    }

    async fn translate_remote(
        &self,
        base: &str,
        text: &str,
        source: &str,
        target: &str,
    ) -> anyhow::Result<String> {
        let value: serde_json::Value = self
            .client
            .get(format!("{base}/translate_a/single"))
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Payload shape: [[["translated","original",...],...],...]
        let segments = value
            .get(0)
            .and_then(|v| v.as_array())
            .context("unexpected translation payload")?;
        let mut translated = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
                translated.push_str(part);
            }
        }
        if translated.is_empty() {
            anyhow::bail!("empty translation result");
        }
        Ok(translated)
    }
}

/// English UI strings keyed the way the frontend requests them
pub fn ui_strings() -> &'static [(&'static str, &'static str)] {
    &[
        // Navigation
        ("dashboard", "Dashboard"),
        ("learning_concepts", "Learning Concepts"),
        ("prepare_lessons", "Prepare Lessons"),
        ("create_curriculum", "Create Curriculum"),
        ("ai_assistant", "AI Assistant"),
        // Common UI
        ("welcome", "Welcome"),
        ("loading", "Loading..."),
        ("save", "Save"),
        ("cancel", "Cancel"),
        ("submit", "Submit"),
        ("close", "Close"),
        ("next", "Next"),
        ("previous", "Previous"),
        ("search", "Search"),
        ("filter", "Filter"),
        // Dashboard
        ("quick_actions", "Quick Actions"),
        ("recent_activities", "Recent Activities"),
        ("teaching_stats", "Teaching Statistics"),
        ("grade_level", "Grade Level"),
        ("curriculum_type", "Curriculum Type"),
        // Learning concepts
        ("explain_concept", "Explain Concept"),
        ("select_topic", "Select Topic"),
        ("grade_optional", "Grade (Optional)"),
        ("not_selected", "Not Selected"),
        ("send_message", "Send Message"),
        // Lesson preparation
        ("generate_materials", "Generate Materials"),
        ("study_material", "Study Material"),
        ("assessment_questions", "Assessment Questions"),
        ("generated_diagram", "Generated Diagram"),
        ("select_subject", "Select Subject"),
        ("select_grade", "Select Grade"),
        // Assistant
        ("teaching_assistant", "Teaching Assistant"),
        ("ask_question", "Ask a question..."),
        ("mentor_guidance", "Mentor Guidance"),
        // Messages
        ("welcome_message", "Welcome to Sahayak, your AI teaching assistant!"),
        ("how_can_i_help", "How can I help you with your teaching today?"),
        ("processing", "Processing your request..."),
        ("error_message", "An error occurred. Please try again."),
        // Profile
        ("profile", "Profile"),
        ("settings", "Settings"),
        ("logout", "Logout"),
        ("teaching_grades", "Teaching Grades"),
        ("school_name", "School Name"),
        ("district", "District"),
        ("state", "State"),
    ]
}

/// Static translation for a UI key, for targets covered without a remote
/// translator
pub fn fallback_translation(key: &str, language: &str) -> Option<&'static str> {
    let table: &[(&str, &str)] = match language {
        "hi" => HINDI_UI,
        "kn" => KANNADA_UI,
        _ => return None,
    };
    table
        .iter()
        .find(|(entry, _)| *entry == key)
        .map(|(_, translated)| *translated)
}

const HINDI_UI: &[(&str, &str)] = &[
    ("dashboard", "डैशबोर्ड"),
    ("learning_concepts", "अवधारणाएं सीखें"),
    ("prepare_lessons", "पाठ तैयार करें"),
    ("create_curriculum", "पाठ्यक्रम बनाएं"),
    ("ai_assistant", "एआई सहायक"),
    ("welcome", "स्वागत है"),
    ("loading", "लोड हो रहा है..."),
    ("save", "सहेजें"),
    ("cancel", "रद्द करें"),
    ("submit", "सबमिट करें"),
    ("close", "बंद करें"),
    ("next", "अगला"),
    ("previous", "पिछला"),
    ("search", "खोजें"),
    ("filter", "फ़िल्टर"),
    ("quick_actions", "त्वरित कार्य"),
    ("recent_activities", "हाल की गतिविधियां"),
    ("teaching_stats", "शिक्षण आंकड़े"),
    ("grade_level", "कक्षा स्तर"),
    ("curriculum_type", "पाठ्यक्रम प्रकार"),
    ("explain_concept", "अवधारणा समझाएं"),
    ("select_topic", "विषय चुनें"),
    ("grade_optional", "कक्षा (वैकल्पिक)"),
    ("not_selected", "चयनित नहीं"),
    ("send_message", "संदेश भेजें"),
    ("generate_materials", "सामग्री उत्पन्न करें"),
    ("study_material", "अध्ययन सामग्री"),
    ("assessment_questions", "मूल्यांकन प्रश्न"),
    ("generated_diagram", "उत्पन्न आरेख"),
    ("select_subject", "विषय चुनें"),
    ("select_grade", "कक्षा चुनें"),
    ("teaching_assistant", "शिक्षण सहायक"),
    ("ask_question", "प्रश्न पूछें..."),
    ("mentor_guidance", "मार्गदर्शन"),
    ("welcome_message", "सहायक में आपका स्वागत है, आपका एआई शिक्षण सहायक!"),
    ("how_can_i_help", "मैं आपकी शिक्षण में कैसे मदद कर सकता हूं?"),
    ("processing", "आपका अनुरोध संसाधित हो रहा है..."),
    ("error_message", "एक त्रुटि हुई। कृपया पुनः प्रयास करें।"),
    ("profile", "प्रोफ़ाइल"),
    ("settings", "सेटिंग्स"),
    ("logout", "लॉगआउट"),
    ("teaching_grades", "शिक्षण कक्षाएं"),
    ("school_name", "स्कूल का नाम"),
    ("district", "जिला"),
    ("state", "राज्य"),
];

const KANNADA_UI: &[(&str, &str)] = &[
    ("dashboard", "ಡ್ಯಾಶ್\u{200c}ಬೋರ್ಡ್"),
    ("learning_concepts", "ಕಲಿಕೆಯ ಪರಿಕಲ್ಪನೆಗಳು"),
    ("prepare_lessons", "ಪಾಠಗಳನ್ನು ತಯಾರಿಸಿ"),
    ("create_curriculum", "ಪಾಠ್ಯಕ್ರಮ ರಚಿಸಿ"),
    ("ai_assistant", "ಎಐ ಸಹಾಯಕ"),
    ("welcome", "ಸುಸ್ವಾಗತ"),
    ("loading", "ಲೋಡ್ ಆಗುತ್ತಿದೆ..."),
    ("save", "ಉಳಿಸಿ"),
    ("cancel", "ರದ್ದುಮಾಡಿ"),
    ("submit", "ಸಲ್ಲಿಸಿ"),
    ("close", "ಮುಚ್ಚಿ"),
    ("next", "ಮುಂದೆ"),
    ("previous", "ಹಿಂದೆ"),
    ("search", "ಹುಡುಕಿ"),
    ("filter", "ಫಿಲ್ಟರ್"),
    ("quick_actions", "ತ್ವರಿತ ಕ್ರಿಯೆಗಳು"),
    ("recent_activities", "ಇತ್ತೀಚಿನ ಚಟುವಟಿಕೆಗಳು"),
    ("teaching_stats", "ಅಧ್ಯಾಪನ ಅಂಕಿಅಂಶಗಳು"),
    ("grade_level", "ತರಗತಿ ಮಟ್ಟ"),
    ("curriculum_type", "ಪಾಠ್ಯಕ್ರಮ ಪ್ರಕಾರ"),
    ("explain_concept", "ಪರಿಕಲ್ಪನೆಯನ್ನು ವಿವರಿಸಿ"),
    ("select_topic", "ವಿಷಯವನ್ನು ಆಯ್ಕೆಮಾಡಿ"),
    ("grade_optional", "ತರಗತಿ (ಐಚ್ಛಿಕ)"),
    ("not_selected", "ಆಯ್ಕೆಮಾಡಲಾಗಿಲ್ಲ"),
    ("send_message", "ಸಂದೇಶ ಕಳುಹಿಸಿ"),
    ("generate_materials", "ಸಾಮಗ್ರಿಗಳನ್ನು ರಚಿಸಿ"),
    ("study_material", "ಅಧ್ಯಯನ ಸಾಮಗ್ರಿ"),
    ("assessment_questions", "ಮೌಲ್ಯಮಾಪನ ಪ್ರಶ್ನೆಗಳು"),
    ("generated_diagram", "ರಚಿಸಲಾದ ರೇಖಾಚಿತ್ರ"),
    ("select_subject", "ವಿಷಯವನ್ನು ಆಯ್ಕೆಮಾಡಿ"),
    ("select_grade", "ತರಗತಿಯನ್ನು ಆಯ್ಕೆಮಾಡಿ"),
    ("teaching_assistant", "ಅಧ್ಯಾಪನ ಸಹಾಯಕ"),
    ("ask_question", "ಪ್ರಶ್ನೆಯನ್ನು ಕೇಳಿ..."),
    ("mentor_guidance", "ಮಾರ್ಗದರ್ಶನ"),
    ("welcome_message", "ಸಹಾಯಕಕ್ಕೆ ಸುಸ್ವಾಗತ, ನಿಮ್ಮ ಎಐ ಅಧ್ಯಾಪನ ಸಹಾಯಕ!"),
    ("how_can_i_help", "ನಿಮ್ಮ ಅಧ್ಯಾಪನದಲ್ಲಿ ನಾನು ಹೇಗೆ ಸಹಾಯ ಮಾಡಬಹುದು?"),
    ("processing", "ನಿಮ್ಮ ವಿನಂತಿಯನ್ನು ಸಂಸ್ಕರಿಸಲಾಗುತ್ತಿದೆ..."),
    ("error_message", "ದೋಷ ಸಂಭವಿಸಿದೆ. ದಯವಿಟ್ಟು ಮತ್ತೆ ಪ್ರಯತ್ನಿಸಿ."),
    ("profile", "ಪ್ರೊಫೈಲ್"),
    ("settings", "ಸೆಟ್ಟಿಂಗ್\u{200c}ಗಳು"),
    ("logout", "ಲಾಗ್\u{200c}ಔಟ್"),
    ("teaching_grades", "ಅಧ್ಯಾಪನ ತರಗತಿಗಳು"),
    ("school_name", "ಶಾಲೆಯ ಹೆಸರು"),
    ("district", "ಜಿಲ್ಲೆ"),
    ("state", "ರಾಜ್ಯ"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_same_language_is_identity() {
        let service = TranslationService::new(None);
        assert_eq!(service.translate("Dashboard", "en", "en").await, "Dashboard");
    }

    #[tokio::test]
    async fn test_fallback_table_covers_ui_keys() {
        let service = TranslationService::new(None);
        assert_eq!(service.translate("dashboard", "en", "hi").await, "डैशबोर्ड");
        assert_eq!(service.translate("welcome", "en", "kn").await, "ಸುಸ್ವಾಗತ");
        // Unknown key or uncovered language: input passes through.
        assert_eq!(service.translate("unknown_key", "en", "hi").await, "unknown_key");
        assert_eq!(service.translate("dashboard", "en", "te").await, "dashboard");
    }

    #[tokio::test]
    async fn test_ui_translations_without_remote() {
        let service = TranslationService::new(None);

        let english = service.ui_translations("en").await;
        assert_eq!(english.get("dashboard").unwrap(), "Dashboard");
        assert_eq!(english.len(), ui_strings().len());

        let hindi = service.ui_translations("hi").await;
        assert_eq!(hindi.get("dashboard").unwrap(), "डैशबोर्ड");
        assert_eq!(hindi.get("state").unwrap(), "राज्य");

        // Uncovered language falls back to English values.
        let telugu = service.ui_translations("te").await;
        assert_eq!(telugu.get("dashboard").unwrap(), "Dashboard");
    }

    #[tokio::test]
    async fn test_remote_translation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "en"))
            .and(query_param("tl", "fr"))
            .and(query_param("q", "Hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
                [[["Bonjour", "Hello", null, null]], null, "en"]
            )))
            .mount(&server)
            .await;

        let service = TranslationService::new(Some(server.uri()));
        assert_eq!(service.translate("Hello", "en", "fr").await, "Bonjour");
    }

    #[tokio::test]
    async fn test_remote_failure_returns_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = TranslationService::new(Some(server.uri()));
        assert_eq!(service.translate("Hello", "en", "fr").await, "Hello");
    }

    #[tokio::test]
    async fn test_ensure_language_skips_non_indic_targets() {
        let server = MockServer::start().await;
        let service = TranslationService::new(Some(server.uri()));
        // French is not rewritten even though a remote is configured.
        assert_eq!(service.ensure_language("Bonjour tout le monde", "fr").await, "Bonjour tout le monde");
    }

    #[tokio::test]
    async fn test_ensure_language_without_remote_is_identity() {
        let service = TranslationService::new(None);
        assert_eq!(service.ensure_language("Plain English", "hi").await, "Plain English");
    }
}
