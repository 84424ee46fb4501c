//! Provider fallback chain
//!
//! Providers are tried in order, one call each, until one yields a usable
//! quiz. Calls are sequential: the fallback only runs when the provider
//! before it failed.

use crate::config::{ApiKeys, Config};
use crate::error::AppError;
use crate::metrics::{AttemptResult, Metrics, Outcome};
use crate::middleware::RequestId;
use crate::providers::{
    GeminiProvider, OpenAiProvider, ProviderAttempt, ProviderError, ProviderSource, QuizProvider,
};
use crate::quiz::QUIZ_PROMPT;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Result of one quiz request
#[derive(Debug)]
pub enum QuizOutcome {
    /// `attempt` is usable; `failed` holds the attempts before it
    Success {
        attempt: ProviderAttempt,
        failed: Vec<ProviderAttempt>,
    },
    /// The last fallback answered but its result is unusable
    PartialFailure {
        attempt: ProviderAttempt,
        failed: Vec<ProviderAttempt>,
    },
    /// Nothing to report but an error
    HardFailure(AppError),
}

impl QuizOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { .. } | Self::PartialFailure { .. } => StatusCode::OK,
            Self::HardFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label for this outcome
    pub fn kind(&self) -> Outcome {
        match self {
            Self::Success { .. } => Outcome::Success,
            Self::PartialFailure { .. } => Outcome::Partial,
            Self::HardFailure(_) => Outcome::Failure,
        }
    }

    /// The attempt that decided the response, if any
    pub fn attempt(&self) -> Option<&ProviderAttempt> {
        match self {
            Self::Success { attempt, .. } | Self::PartialFailure { attempt, .. } => Some(attempt),
            Self::HardFailure(_) => None,
        }
    }

    /// Response body
    ///
    /// 200 outcomes: `{source, quiz, parseError, content, <source>Response}`
    /// plus, for each earlier failed attempt, `<source>Error` (when present),
    /// `<source>Content` and `<source>Response`. Hard failures use the
    /// error body.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success { attempt, failed } | Self::PartialFailure { attempt, failed } => {
                Self::body(attempt, failed)
            }
            Self::HardFailure(error) => error.body(),
        }
    }

    fn body(attempt: &ProviderAttempt, failed: &[ProviderAttempt]) -> Value {
        let mut body = Map::new();
        body.insert("source".into(), Value::from(attempt.source.as_str()));
        body.insert(
            "quiz".into(),
            serde_json::to_value(&attempt.quiz).unwrap_or(Value::Null),
        );
        body.insert(
            "parseError".into(),
            attempt.parse_error.clone().map_or(Value::Null, Value::from),
        );
        body.insert("content".into(), Value::from(attempt.content.clone()));
        body.insert(
            format!("{}Response", attempt.source),
            attempt.response.clone(),
        );

        for prior in failed {
            if let Some(error) = &prior.provider_error {
                body.insert(format!("{}Error", prior.source), error.clone());
            }
            body.insert(
                format!("{}Content", prior.source),
                Value::from(prior.content.clone()),
            );
            body.insert(format!("{}Response", prior.source), prior.response.clone());
        }

        Value::Object(body)
    }
}

impl IntoResponse for QuizOutcome {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_json())).into_response()
    }
}

/// Ordered list of providers with fallback
pub struct QuizGenerator {
    providers: Vec<Arc<dyn QuizProvider>>,
    metrics: Arc<Metrics>,
}

impl QuizGenerator {
    pub fn new(providers: Vec<Arc<dyn QuizProvider>>, metrics: Arc<Metrics>) -> Self {
        Self { providers, metrics }
    }

    /// OpenAI first when its key is set, then Gemini when its key is set
    pub fn from_keys(
        config: &Config,
        keys: &ApiKeys,
        client: reqwest::Client,
        metrics: Arc<Metrics>,
    ) -> Self {
        let mut providers: Vec<Arc<dyn QuizProvider>> = Vec::new();

        if let Some(key) = keys.openai() {
            providers.push(Arc::new(OpenAiProvider::new(
                client.clone(),
                key,
                config.providers.openai.clone(),
            )));
        }
        if let Some(key) = keys.gemini() {
            providers.push(Arc::new(GeminiProvider::new(
                client,
                key,
                config.providers.gemini.clone(),
            )));
        }

        if providers.is_empty() {
            tracing::warn!(
                "No provider API key configured; every quiz request will fail until \
                OPENAI_API_KEY or GEMINI_API_KEY is set"
            );
        }

        Self::new(providers, metrics)
    }

    /// Configured providers, in the order they are tried
    pub fn sources(&self) -> Vec<ProviderSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Produce one quiz, falling back across providers
    pub async fn generate(&self, request_id: RequestId) -> QuizOutcome {
        let outcome = self.run_chain(request_id).await;

        if let Err(e) = self.metrics.record_request(outcome.kind()) {
            tracing::warn!(error = %e, "Failed to record request metric");
        }

        match &outcome {
            QuizOutcome::Success { attempt, failed } => tracing::info!(
                request_id = %request_id,
                source = %attempt.source,
                fallbacks = failed.len(),
                "Quiz generated"
            ),
            QuizOutcome::PartialFailure { attempt, .. } => tracing::warn!(
                request_id = %request_id,
                source = %attempt.source,
                reason = %attempt.failure_summary(),
                "All providers answered but none produced a usable quiz"
            ),
            QuizOutcome::HardFailure(error) => tracing::error!(
                request_id = %request_id,
                error = %error,
                details = ?error.details(),
                "Quiz generation failed"
            ),
        }

        outcome
    }

    async fn run_chain(&self, request_id: RequestId) -> QuizOutcome {
        if self.providers.is_empty() {
            return QuizOutcome::HardFailure(AppError::MissingApiKeys);
        }

        let mut failed: Vec<ProviderAttempt> = Vec::new();

        for provider in &self.providers {
            let attempt = self.attempt(provider.as_ref(), request_id).await;

            if attempt.is_usable() {
                return QuizOutcome::Success { attempt, failed };
            }

            tracing::warn!(
                request_id = %request_id,
                provider = %attempt.source,
                reason = %attempt.failure_summary(),
                "Provider attempt unusable"
            );
            failed.push(attempt);
        }

        // The loop ran at least once, so there is a last attempt
        let Some(last) = failed.pop() else {
            return QuizOutcome::HardFailure(AppError::Internal(
                "provider chain produced no attempts".to_string(),
            ));
        };

        if failed.is_empty() {
            // Only one provider configured; nothing left to fall back to
            return QuizOutcome::HardFailure(AppError::ProvidersExhausted {
                details: last.failure_summary(),
            });
        }

        if last.transport_failed {
            let mut details: Vec<String> = failed.iter().map(|a| a.failure_summary()).collect();
            details.push(last.failure_summary());
            return QuizOutcome::HardFailure(AppError::Upstream {
                details: details.join("; "),
            });
        }

        QuizOutcome::PartialFailure {
            attempt: last,
            failed,
        }
    }

    /// One bounded provider call; transport failures become attempts
    async fn attempt(&self, provider: &dyn QuizProvider, request_id: RequestId) -> ProviderAttempt {
        let source = provider.source();
        let timeout = provider.timeout();

        tracing::debug!(
            request_id = %request_id,
            provider = %source,
            timeout_seconds = timeout.as_secs(),
            "Calling provider"
        );

        let started = Instant::now();
        let result = match tokio::time::timeout(timeout, provider.generate(QUIZ_PROMPT)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ProviderError::Timeout {
                provider: source,
                timeout_seconds: timeout.as_secs(),
            }),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let attempt = match result {
            Ok(attempt) => attempt,
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    provider = %source,
                    error = %e,
                    "Provider call failed"
                );
                ProviderAttempt::from_transport_error(source, &e)
            }
        };

        if let Err(e) = self.metrics.record_provider_duration(source, elapsed_ms) {
            tracing::warn!(error = %e, "Failed to record provider duration");
        }
        if let Err(e) = self
            .metrics
            .record_attempt(source, AttemptResult::of(&attempt))
        {
            tracing::warn!(error = %e, "Failed to record provider attempt");
        }

        attempt
    }
}
