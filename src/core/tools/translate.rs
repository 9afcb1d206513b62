//! Translator: sends text with the target language name.

use serde_json::{Value, json};

use super::{ToolId, ToolOutput, WritingTool};
use crate::core::service::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> Language {
    Language { code, name }
}

/// Supported languages. `auto` is only meaningful as a source language.
pub const LANGUAGES: [Language; 18] = [
    lang("auto", "Auto Detect"),
    lang("en", "English"),
    lang("es", "Spanish"),
    lang("fr", "French"),
    lang("de", "German"),
    lang("it", "Italian"),
    lang("pt", "Portuguese"),
    lang("ru", "Russian"),
    lang("zh", "Chinese"),
    lang("ja", "Japanese"),
    lang("ko", "Korean"),
    lang("ar", "Arabic"),
    lang("hi", "Hindi"),
    lang("bn", "Bengali"),
    lang("tr", "Turkish"),
    lang("nl", "Dutch"),
    lang("pl", "Polish"),
    lang("uk", "Ukrainian"),
];

/// Look up a language by code or name (case-insensitive).
pub fn resolve_language(query: &str) -> Option<&'static Language> {
    let q = query.trim();
    LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(q) || l.name.eq_ignore_ascii_case(q))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateTool {
    target: String,
}

impl TranslateTool {
    /// Target given as code or name. Unknown values are sent verbatim.
    pub fn new(target: &str) -> Self {
        let target = match resolve_language(target) {
            Some(l) if l.code == "auto" => {
                log::warn!("'auto' is only valid as a source language; translating to English");
                "English".to_string()
            }
            Some(l) => l.name.to_string(),
            None => target.trim().to_string(),
        };
        Self { target }
    }

    /// Language name sent to the service.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for TranslateTool {
    fn default() -> Self {
        Self::new("en")
    }
}

impl WritingTool for TranslateTool {
    fn id(&self) -> ToolId {
        ToolId::Translate
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/translate")
    }

    fn empty_input_message(&self) -> &'static str {
        "Please enter text to translate"
    }

    fn unavailable_text(&self) -> &'static str {
        "Translation not available."
    }

    fn failure_message(&self) -> &'static str {
        "Translation failed. Please try again."
    }

    fn request_body(&self, input: &str) -> Value {
        json!({
            "content": input,
            "targetLang": self.target,
        })
    }

    fn saved_text(&self, input: &str, output: &ToolOutput) -> Option<String> {
        Some(download_text(input, &output.text))
    }
}

/// Contents of a saved translation file.
pub fn download_text(source: &str, translation: &str) -> String {
    format!("Source: {}\n\nTranslation: {}", source, translation)
}
