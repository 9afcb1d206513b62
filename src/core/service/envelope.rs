//! Response envelopes. Each endpoint family has exactly one accepted shape;
//! anything else is reported as `ServiceError::UnexpectedShape`.

use serde::Deserialize;
use serde_json::Value;

use super::ServiceError;

/// `{"response": {"message": {"content": ...}}}`
#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Value,
}

/// Extract the message content from a text-tool response.
/// The content is returned as-is (it may be `null` or a non-string value).
pub fn message_content(route: &'static str, body: Value) -> Result<Value, ServiceError> {
    let envelope: MessageEnvelope =
        serde_json::from_value(body).map_err(|e| ServiceError::UnexpectedShape {
            route,
            reason: e.to_string(),
        })?;
    Ok(envelope.response.message.content)
}

/// Summarizer response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryEnvelope {
    pub summary: String,
    pub summary_word_count: Option<u64>,
    pub original_word_count: Option<u64>,
    pub model: Option<String>,
    pub timestamp: Option<String>,
}

/// Decode a summarizer response. An empty summary counts as a shape mismatch.
pub fn summary(route: &'static str, body: Value) -> Result<SummaryEnvelope, ServiceError> {
    let envelope: SummaryEnvelope =
        serde_json::from_value(body).map_err(|e| ServiceError::UnexpectedShape {
            route,
            reason: e.to_string(),
        })?;
    if envelope.summary.trim().is_empty() {
        return Err(ServiceError::UnexpectedShape {
            route,
            reason: "no summary found in response".to_string(),
        });
    }
    Ok(envelope)
}
