//! Summarizer: the only tool with its own response envelope (summary + stats).

use serde_json::{Value, json};

use super::{Reply, ToolId, ToolOutput, WritingTool};
use crate::core::service::{self, Endpoint, ServiceError};
use crate::core::util::word_count;

pub struct SummarizeTool;

impl WritingTool for SummarizeTool {
    fn id(&self) -> ToolId {
        ToolId::Summarizer
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::post("/ai-summarizing/summarize")
    }

    fn empty_input_message(&self) -> &'static str {
        "Please enter text to summarize"
    }

    fn unavailable_text(&self) -> &'static str {
        "Summary not available."
    }

    fn failure_message(&self) -> &'static str {
        "Summarization failed. Please try again."
    }

    fn request_body(&self, input: &str) -> Value {
        json!({ "content": input })
    }

    fn saved_text(&self, input: &str, output: &ToolOutput) -> Option<String> {
        let stats = output.summary.as_ref();
        let summary_words = stats
            .and_then(|s| s.summary_word_count)
            .unwrap_or_else(|| word_count(&output.text) as u64);
        let model = stats.and_then(|s| s.model.as_deref()).unwrap_or("N/A");
        let generated = stats
            .and_then(|s| s.timestamp.as_deref())
            .map(local_time)
            .unwrap_or_else(|| "N/A".to_string());
        Some(format!(
            "Original Text ({} words):\n{}\n\nSummary ({} words):\n{}\n\nReduction: {}%\nModel: {}\nGenerated: {}",
            word_count(input),
            input,
            summary_words,
            output.text,
            reduction_percentage(input, &output.text),
            model,
            generated
        ))
    }

    fn read_response(&self, route: &'static str, body: Value) -> Result<Reply, ServiceError> {
        let summary = service::summary(route, body)?;
        Ok(Reply {
            content: Value::String(summary.summary.clone()),
            summary: Some(summary),
        })
    }
}

/// How much shorter the summary is than the original, in whole percent of
/// the original's word count. 0 when either text is blank.
pub fn reduction_percentage(original: &str, summary: &str) -> u32 {
    let original = word_count(original);
    let summary = word_count(summary);
    if original == 0 || summary == 0 {
        return 0;
    }
    let pct = (original as f64 - summary as f64) / original as f64 * 100.0;
    pct.round().max(0.0) as u32
}

/// Service timestamps are RFC 3339; show them in local time. Anything else is shown as sent.
fn local_time(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}
