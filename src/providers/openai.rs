//! OpenAI chat-completions provider

use super::{ProviderAttempt, ProviderError, ProviderSource, QuizProvider, status_error};
use crate::config::ProviderSettings;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Sampling temperature for quiz generation
pub const OPENAI_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

/// Calls `POST {base_url}/chat/completions`
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    settings: ProviderSettings,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, settings: ProviderSettings) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            settings,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url())
    }

    /// `choices[0].message.content`, or empty when the shape differs
    fn extract_content(body: &Value) -> String {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl QuizProvider for OpenAiProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::OpenAi
    }

    fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderAttempt, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.settings.model(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: OPENAI_TEMPERATURE,
        };

        tracing::debug!(
            model = %self.settings.model(),
            url = %self.url(),
            "Sending chat completion request to OpenAI"
        );

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::http(ProviderSource::OpenAi, e))?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|e| ProviderError::InvalidResponse {
            provider: ProviderSource::OpenAi,
            reason: format!("HTTP {} with non-JSON body: {}", status.as_u16(), e.without_url()),
        })?;

        let provider_error = status_error(status, &body);
        if let Some(error) = &provider_error {
            tracing::warn!(
                status = status.as_u16(),
                error = %error,
                "OpenAI reported an error"
            );
        }

        let content = Self::extract_content(&body);
        Ok(ProviderAttempt::from_content(
            ProviderSource::OpenAi,
            content,
            body,
            provider_error,
        ))
    }
}
