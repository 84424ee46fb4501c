//! Gemini generateContent provider

use super::{ProviderAttempt, ProviderError, ProviderSource, QuizProvider, status_error};
use crate::config::ProviderSettings;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

/// Calls `POST {base_url}/models/{model}:generateContent?key=...`
///
/// Gemini often wraps its JSON in a code fence despite the prompt; the
/// shared quiz parser strips it.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, settings: ProviderSettings) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            settings,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url(),
            self.settings.model()
        )
    }

    fn extract_content(body: &Value) -> String {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl QuizProvider for GeminiProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::Gemini
    }

    fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderAttempt, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        // The URL is logged without the key query parameter
        tracing::debug!(
            model = %self.settings.model(),
            url = %self.url(),
            "Sending generateContent request to Gemini"
        );

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::http(ProviderSource::Gemini, e))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| ProviderError::InvalidResponse {
            provider: ProviderSource::Gemini,
            reason: format!("HTTP {} with non-JSON body: {}", status.as_u16(), e.without_url()),
        })?;

        let provider_error = status_error(status, &body);
        if let Some(error) = &provider_error {
            tracing::warn!(
                status = status.as_u16(),
                error = %error,
                "Gemini reported an error"
            );
        }

        let content = Self::extract_content(&body);
        Ok(ProviderAttempt::from_content(
            ProviderSource::Gemini,
            content,
            body,
            provider_error,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "prompt" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"parts": [{"text": "prompt"}]}]})
        );
    }

    #[test]
    fn test_extract_content() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "```json\n{}\n```"}], "role": "model"}}]
        });
        assert_eq!(GeminiProvider::extract_content(&body), "```json\n{}\n```");
    }

    #[test]
    fn test_extract_content_blocked_prompt() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert_eq!(GeminiProvider::extract_content(&body), "");
    }

    #[test]
    fn test_fenced_gemini_content_parses() {
        let content = "```json\n{\"question\":\"Q\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"answer\":\"B\"}\n```";
        let attempt =
            ProviderAttempt::from_content(ProviderSource::Gemini, content.into(), json!({}), None);
        assert!(attempt.is_usable());
        assert_eq!(attempt.content, content);
    }
}
