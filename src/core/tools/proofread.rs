//! Proofreader: corrects text in a chosen writing style and language.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use super::{ParseOptionError, ToolId, ToolOutput, WritingTool};
use crate::core::service::Endpoint;

/// Languages the proofreader accepts.
pub const PROOFREAD_LANGUAGES: [&str; 5] = ["English", "Spanish", "French", "German", "Italian"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProofreadStyle {
    #[default]
    Formal,
    Casual,
    Academic,
    Business,
    Creative,
}

impl ProofreadStyle {
    pub const ALL: [ProofreadStyle; 5] = [
        ProofreadStyle::Formal,
        ProofreadStyle::Casual,
        ProofreadStyle::Academic,
        ProofreadStyle::Business,
        ProofreadStyle::Creative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProofreadStyle::Formal => "formal",
            ProofreadStyle::Casual => "casual",
            ProofreadStyle::Academic => "academic",
            ProofreadStyle::Business => "business",
            ProofreadStyle::Creative => "creative",
        }
    }
}

impl fmt::Display for ProofreadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProofreadStyle {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProofreadStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseOptionError {
                kind: "style",
                value: s.to_string(),
                expected: ProofreadStyle::ALL
                    .iter()
                    .map(|style| style.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofreadTool {
    pub style: ProofreadStyle,
    language: &'static str,
}

impl Default for ProofreadTool {
    fn default() -> Self {
        Self {
            style: ProofreadStyle::default(),
            language: PROOFREAD_LANGUAGES[0],
        }
    }
}

impl ProofreadTool {
    /// Build a proofreader for `style` and `language` (case-insensitive language name).
    pub fn new(style: ProofreadStyle, language: &str) -> Result<Self, ParseOptionError> {
        let language = PROOFREAD_LANGUAGES
            .into_iter()
            .find(|l| l.eq_ignore_ascii_case(language.trim()))
            .ok_or_else(|| ParseOptionError {
                kind: "language",
                value: language.to_string(),
                expected: PROOFREAD_LANGUAGES.join(", "),
            })?;
        Ok(Self { style, language })
    }

    pub fn language(&self) -> &'static str {
        self.language
    }
}

impl WritingTool for ProofreadTool {
    fn id(&self) -> ToolId {
        ToolId::Proofreader
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/ai-proofreader")
    }

    fn empty_input_message(&self) -> &'static str {
        "Please enter text to proofread"
    }

    fn unavailable_text(&self) -> &'static str {
        "Proofread text not available."
    }

    fn failure_message(&self) -> &'static str {
        "Proofreading failed. Please try again."
    }

    fn request_body(&self, input: &str) -> Value {
        json!({
            "content": input,
            "options": {
                "style": self.style.as_str(),
                "language": self.language,
            }
        })
    }

    fn saved_text(&self, input: &str, output: &ToolOutput) -> Option<String> {
        Some(format!("Original: {}\n\nProofread: {}", input, output.text))
    }
}
