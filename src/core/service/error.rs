//! Service error types.

/// Errors from talking to the AI service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("could not reach the AI service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response from {route} is not valid JSON: {source}")]
    Decode {
        route: &'static str,
        source: serde_json::Error,
    },
    /// The body parsed as JSON but does not match the endpoint's envelope.
    #[error("unexpected response shape from {route}: {reason}")]
    UnexpectedShape { route: &'static str, reason: String },
    #[error("Request cancelled")]
    Cancelled,
}

impl ServiceError {
    /// True for failures where the service could not be reached or did not answer in time.
    pub fn is_unavailable(&self) -> bool {
        match self {
            ServiceError::Transport(e) => e.is_connect() || e.is_timeout(),
            ServiceError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Pull a readable message out of an error body.
/// Understands `{"error":{"message":..}}`, `{"error":".."}` and `{"message":".."}`;
/// anything else is returned trimmed as-is.
pub fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };
    let message = value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str());
    match message {
        Some(msg) => msg.to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_nested_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded"}}"#;
        assert_eq!(error_detail(body), "Rate limit exceeded");
    }

    #[test]
    fn error_detail_flat_error() {
        assert_eq!(error_detail(r#"{"error":"model not loaded"}"#), "model not loaded");
        assert_eq!(error_detail(r#"{"message":"bad input"}"#), "bad input");
    }

    #[test]
    fn error_detail_plain_text() {
        assert_eq!(error_detail("  Internal Server Error \n"), "Internal Server Error");
    }

    #[test]
    fn error_detail_json_without_message() {
        assert_eq!(error_detail(r#"{"code":7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn server_errors_count_as_unavailable() {
        let err = ServiceError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_unavailable());
        let err = ServiceError::Status {
            status: 400,
            body: String::new(),
        };
        assert!(!err.is_unavailable());
        assert!(!ServiceError::Cancelled.is_unavailable());
    }
}
