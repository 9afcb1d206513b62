//! AI chat: free-form prompts sent to the chat endpoint.

use serde_json::{Value, json};

use super::{ToolId, WritingTool};
use crate::core::service::Endpoint;

const ENDPOINT: Endpoint = Endpoint::post("/ollama/ask");

/// Chat tool. Also used to run templates and to probe the connection.
pub struct ChatTool;

impl WritingTool for ChatTool {
    fn id(&self) -> ToolId {
        ToolId::AiChat
    }

    fn endpoint(&self) -> Endpoint {
        ENDPOINT
    }

    fn empty_input_message(&self) -> &'static str {
        "Please enter a message"
    }

    fn unavailable_text(&self) -> &'static str {
        "No response from the AI service."
    }

    fn failure_message(&self) -> &'static str {
        "AI service is temporarily unavailable. Using fallback mode."
    }

    fn request_body(&self, input: &str) -> Value {
        json!({ "prompt": input })
    }
}

/// Reply shown in place of the AI answer when the request fails.
pub fn fallback_message(prompt: &str, error: &dyn std::fmt::Display) -> String {
    format!(
        "I understand you're asking about \"{}\". This is a fallback response because the AI service is currently unavailable. Error: {}",
        prompt.trim(),
        error
    )
}
