//! Writing tools: the tool catalogue and the request/response contract each
//! AI-backed tool has with the service.

mod chat;
mod humanize;
mod proofread;
mod summarize;
mod translate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::core::normalize::normalize_value;
use crate::core::service::{
    Endpoint, ServiceClient, ServiceError, SummaryEnvelope, message_content,
};

pub use chat::{ChatTool, fallback_message};
pub use humanize::HumanizeTool;
pub use proofread::{ProofreadStyle, ProofreadTool};
pub use summarize::{SummarizeTool, reduction_percentage};
pub use translate::{LANGUAGES, TranslateTool};

/// Identifier of a tool panel. Serialized in kebab-case (`ai-chat`, `translate`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    #[default]
    AiChat,
    Translate,
    AiHumanizer,
    Proofreader,
    Summarizer,
    Templates,
    History,
}

impl ToolId {
    /// Catalogue order, as listed in the tool menu.
    pub const ALL: [ToolId; 7] = [
        ToolId::AiChat,
        ToolId::Translate,
        ToolId::AiHumanizer,
        ToolId::Proofreader,
        ToolId::Summarizer,
        ToolId::Templates,
        ToolId::History,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolId::AiChat => "ai-chat",
            ToolId::Translate => "translate",
            ToolId::AiHumanizer => "ai-humanizer",
            ToolId::Proofreader => "proofreader",
            ToolId::Summarizer => "summarizer",
            ToolId::Templates => "templates",
            ToolId::History => "history",
        }
    }

    /// Short menu label.
    pub fn label(self) -> &'static str {
        match self {
            ToolId::AiChat => "AI Chat",
            ToolId::Translate => "Translate",
            ToolId::AiHumanizer => "AI Humanizer",
            ToolId::Proofreader => "Proofreader",
            ToolId::Summarizer => "Summarizer",
            ToolId::Templates => "Templates",
            ToolId::History => "History",
        }
    }

    /// Panel title.
    pub fn title(self) -> &'static str {
        match self {
            ToolId::AiChat => "AI Chat Assistant",
            ToolId::Translate => "AI Translator",
            ToolId::AiHumanizer => "AI Humanizer",
            ToolId::Proofreader => "Proofreader",
            ToolId::Summarizer => "Summarizer",
            ToolId::Templates => "Content Templates",
            ToolId::History => "History & Versions",
        }
    }

    /// Subcommand that opens this tool.
    pub fn command(self) -> &'static str {
        match self {
            ToolId::AiChat => "chat",
            ToolId::Translate => "translate",
            ToolId::AiHumanizer => "humanize",
            ToolId::Proofreader => "proofread",
            ToolId::Summarizer => "summarize",
            ToolId::Templates => "templates",
            ToolId::History => "history",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid value for a tool id or tool option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl FromStr for ToolId {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ToolId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOptionError {
                kind: "tool",
                value: s.to_string(),
                expected: ToolId::ALL
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Output of an AI-backed tool run.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// Normalized display text.
    pub text: String,
    /// Text as returned by the service.
    pub raw: String,
    /// Summarizer statistics, when the tool provides them.
    pub summary: Option<SummaryEnvelope>,
}

/// Reply content extracted from a response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub content: Value,
    pub summary: Option<SummaryEnvelope>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Blank input; no request was sent.
    #[error("{0}")]
    EmptyInput(&'static str),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// An AI-backed tool: builds the request body for its endpoint and reads the reply.
pub trait WritingTool {
    fn id(&self) -> ToolId;
    fn endpoint(&self) -> Endpoint;
    /// Message for blank input.
    fn empty_input_message(&self) -> &'static str;
    /// Text shown when the service answers with empty content.
    fn unavailable_text(&self) -> &'static str;
    /// Message shown when the request fails.
    fn failure_message(&self) -> &'static str;
    fn request_body(&self, input: &str) -> Value;

    /// Contents of a file saved with `--output`. `None` saves the displayed text.
    fn saved_text(&self, _input: &str, _output: &ToolOutput) -> Option<String> {
        None
    }

    /// Decode the response body. Defaults to the message envelope.
    fn read_response(&self, route: &'static str, body: Value) -> Result<Reply, ServiceError> {
        Ok(Reply {
            content: message_content(route, body)?,
            summary: None,
        })
    }
}

/// Run a tool: validate input, call its endpoint, normalize the reply.
pub async fn run<T>(
    client: &ServiceClient,
    tool: &T,
    input: &str,
    cancel: &CancellationToken,
) -> Result<ToolOutput, ToolError>
where
    T: WritingTool + ?Sized,
{
    if input.trim().is_empty() {
        return Err(ToolError::EmptyInput(tool.empty_input_message()));
    }
    let endpoint = tool.endpoint();
    log::info!(
        "{}: sending {} chars to {}",
        tool.id(),
        input.chars().count(),
        endpoint.path
    );

    let body = client.call(&endpoint, &tool.request_body(input), cancel).await?;
    let reply = tool.read_response(endpoint.path, body)?;

    let text = normalize_value(&reply.content);
    if text.is_empty() {
        log::warn!("{}: service returned empty content", tool.id());
        let fallback = tool.unavailable_text().to_string();
        return Ok(ToolOutput {
            text: fallback.clone(),
            raw: fallback,
            summary: reply.summary,
        });
    }
    let raw = match reply.content {
        Value::String(s) => s,
        other => other.to_string(),
    };
    Ok(ToolOutput {
        text,
        raw,
        summary: reply.summary,
    })
}
