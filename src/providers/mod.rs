//! LLM providers that can produce a quiz question
//!
//! Every provider implements [`QuizProvider`]. A provider call yields a
//! [`ProviderAttempt`] whenever the provider answered with JSON, even if the
//! provider reported an error or the content failed to parse; those are data,
//! not failures. Only transport problems surface as [`ProviderError`].

use crate::quiz::{QuizQuestion, parse_quiz};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Which LLM API produced an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    OpenAi,
    Gemini,
}

impl ProviderSource {
    /// Lowercase name used on the wire, in logs and as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSource::OpenAi => "openai",
            ProviderSource::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure talking to a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to {provider} failed: {source}")]
    Http {
        provider: ProviderSource,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {provider} timed out after {timeout_seconds} seconds")]
    Timeout {
        provider: ProviderSource,
        timeout_seconds: u64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse {
        provider: ProviderSource,
        reason: String,
    },
}

impl ProviderError {
    /// Wrap a reqwest error, dropping the URL so query-string keys never leak
    pub fn http(provider: ProviderSource, source: reqwest::Error) -> Self {
        Self::Http {
            provider,
            source: source.without_url(),
        }
    }
}

/// Outcome of one provider call that returned a JSON body
#[derive(Debug, Clone)]
pub struct ProviderAttempt {
    pub source: ProviderSource,
    pub quiz: Option<QuizQuestion>,
    pub parse_error: Option<String>,
    /// Raw model text, before fence stripping
    pub content: String,
    /// Full provider response body
    pub response: Value,
    /// Error reported by the provider itself, or the transport error text
    pub provider_error: Option<Value>,
    /// Set when the call never produced a provider response
    pub transport_failed: bool,
}

impl ProviderAttempt {
    /// Build an attempt from extracted model text
    ///
    /// Parsing is always attempted; a provider error does not skip it.
    pub fn from_content(
        source: ProviderSource,
        content: String,
        response: Value,
        provider_error: Option<Value>,
    ) -> Self {
        let (quiz, parse_error) = match parse_quiz(&content) {
            Ok(quiz) => (Some(quiz), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            source,
            quiz,
            parse_error,
            content,
            response,
            provider_error,
            transport_failed: false,
        }
    }

    /// Record a call that failed before any response body was available
    pub fn from_transport_error(source: ProviderSource, error: &ProviderError) -> Self {
        Self {
            source,
            quiz: None,
            parse_error: None,
            content: String::new(),
            response: Value::Null,
            provider_error: Some(Value::String(error.to_string())),
            transport_failed: true,
        }
    }

    /// Usable means a quiz parsed with no provider error and no parse error
    pub fn is_usable(&self) -> bool {
        self.provider_error.is_none() && self.parse_error.is_none() && self.quiz.is_some()
    }

    /// Single-line description of why the attempt is not usable
    pub fn failure_summary(&self) -> String {
        if let Some(error) = &self.provider_error {
            let text = match error {
                Value::String(s) => s.clone(),
                other => other
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            };
            format!("{}: provider error: {}", self.source, text)
        } else if let Some(parse_error) = &self.parse_error {
            format!("{}: {}", self.source, parse_error)
        } else {
            format!("{}: no quiz in response", self.source)
        }
    }
}

/// A provider error for a non-success HTTP status
///
/// Prefers the body's own `error` field; falls back to the status code.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &Value) -> Option<Value> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Some(error.clone());
    }
    if status.is_success() {
        return None;
    }
    Some(serde_json::json!({
        "status": status.as_u16(),
        "message": format!("HTTP {}", status.as_u16()),
    }))
}

/// Something that can be asked for one quiz question
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Which API this provider talks to
    fn source(&self) -> ProviderSource;

    /// Upper bound on one `generate()` call
    fn timeout(&self) -> Duration;

    /// Send the prompt and turn the reply into an attempt
    async fn generate(&self, prompt: &str) -> Result<ProviderAttempt, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID: &str = r#"{"question":"Q","options":["A","B","C","D"],"answer":"A"}"#;

    #[test]
    fn test_source_names() {
        assert_eq!(ProviderSource::OpenAi.as_str(), "openai");
        assert_eq!(ProviderSource::Gemini.to_string(), "gemini");
        assert_eq!(
            serde_json::to_value(ProviderSource::OpenAi).unwrap(),
            json!("openai")
        );
    }

    #[test]
    fn test_valid_content_is_usable() {
        let attempt =
            ProviderAttempt::from_content(ProviderSource::OpenAi, VALID.into(), json!({}), None);
        assert!(attempt.is_usable());
        assert!(attempt.parse_error.is_none());
    }

    #[test]
    fn test_parse_error_is_not_usable() {
        let attempt = ProviderAttempt::from_content(
            ProviderSource::OpenAi,
            "not json".into(),
            json!({}),
            None,
        );
        assert!(!attempt.is_usable());
        assert!(attempt.quiz.is_none());
        assert!(attempt.provider_error.is_none());
        assert!(attempt.failure_summary().starts_with("openai: Failed to parse"));
    }

    #[test]
    fn test_provider_error_with_valid_content_is_not_usable() {
        let attempt = ProviderAttempt::from_content(
            ProviderSource::Gemini,
            VALID.into(),
            json!({}),
            Some(json!({"message": "quota exceeded"})),
        );
        assert!(attempt.quiz.is_some());
        assert!(attempt.parse_error.is_none());
        assert!(!attempt.is_usable());
        assert_eq!(
            attempt.failure_summary(),
            "gemini: provider error: quota exceeded"
        );
    }

    #[test]
    fn test_transport_error_attempt() {
        let error = ProviderError::Timeout {
            provider: ProviderSource::OpenAi,
            timeout_seconds: 15,
        };
        let attempt = ProviderAttempt::from_transport_error(ProviderSource::OpenAi, &error);
        assert!(attempt.transport_failed);
        assert!(!attempt.is_usable());
        assert_eq!(attempt.response, Value::Null);
        assert_eq!(
            attempt.provider_error,
            Some(json!("Request to openai timed out after 15 seconds"))
        );
    }

    #[test]
    fn test_status_error_prefers_body_error() {
        let body = json!({"error": {"message": "bad key", "code": "invalid_api_key"}});
        let error = status_error(reqwest::StatusCode::UNAUTHORIZED, &body);
        assert_eq!(error, Some(body["error"].clone()));
    }

    #[test]
    fn test_status_error_synthesized_from_status() {
        let error = status_error(reqwest::StatusCode::BAD_GATEWAY, &json!({}));
        assert_eq!(error, Some(json!({"status": 502, "message": "HTTP 502"})));
    }

    #[test]
    fn test_status_error_none_on_success() {
        assert_eq!(status_error(reqwest::StatusCode::OK, &json!({"error": null})), None);
    }
}
