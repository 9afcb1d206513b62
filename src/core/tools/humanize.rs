//! AI humanizer: rewrites machine-sounding text.

use serde_json::{Value, json};

use super::{ToolId, ToolOutput, WritingTool};
use crate::core::service::Endpoint;

pub struct HumanizeTool;

impl WritingTool for HumanizeTool {
    fn id(&self) -> ToolId {
        ToolId::AiHumanizer
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/ai-humanize")
    }

    fn empty_input_message(&self) -> &'static str {
        "Please enter text to humanize"
    }

    fn unavailable_text(&self) -> &'static str {
        "Humanized text not available."
    }

    fn failure_message(&self) -> &'static str {
        "Humanization failed. Please try again."
    }

    fn request_body(&self, input: &str) -> Value {
        json!({ "content": input })
    }

    fn saved_text(&self, input: &str, output: &ToolOutput) -> Option<String> {
        Some(format!("Original: {}\n\nHumanized: {}", input, output.text))
    }
}
