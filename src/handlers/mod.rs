//! HTTP request handlers for the awsquiz API

use crate::config::{ApiKeys, Config};
use crate::error::{AppError, AppResult};
use crate::generator::QuizGenerator;
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use axum::{Router, response::Response, routing::get};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod health;
pub mod metrics;
pub mod quiz;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    generator: Arc<QuizGenerator>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Build the provider chain from configuration and API keys
    pub fn new(config: Arc<Config>, keys: &ApiKeys) -> AppResult<Self> {
        let metrics = Arc::new(
            Metrics::new()
                .map_err(|e| AppError::Internal(format!("Failed to create metrics: {}", e)))?,
        );

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let generator = Arc::new(QuizGenerator::from_keys(
            &config,
            keys,
            client,
            metrics.clone(),
        ));

        Ok(Self::with_generator(config, generator, metrics))
    }

    /// Use an already built generator
    pub fn with_generator(
        config: Arc<Config>,
        generator: Arc<QuizGenerator>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            config,
            generator,
            metrics,
        }
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the quiz generator
    pub fn generator(&self) -> &QuizGenerator {
        &self.generator
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Turn a handler panic into a JSON 500
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(details = %details, "Handler panicked");

    axum::response::IntoResponse::into_response(AppError::Upstream { details })
}

/// All routes with request IDs, tracing and panic recovery
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/quiz", get(quiz::handler).post(quiz::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        // Innermost first: panic responses still get a request ID and a trace span
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderSource;

    #[test]
    fn test_appstate_with_both_keys() {
        let keys = ApiKeys::new(Some("sk-test".into()), Some("g-test".into()));
        let state = AppState::new(Arc::new(Config::default()), &keys).expect("should create state");

        assert_eq!(
            state.generator().sources(),
            vec![ProviderSource::OpenAi, ProviderSource::Gemini]
        );
        assert_eq!(state.config().server.port, 3000);
    }

    #[test]
    fn test_appstate_gemini_only() {
        let keys = ApiKeys::new(None, Some("g-test".into()));
        let state = AppState::new(Arc::new(Config::default()), &keys).expect("should create state");
        assert_eq!(state.generator().sources(), vec![ProviderSource::Gemini]);
    }

    #[test]
    fn test_appstate_without_keys_still_builds() {
        let state = AppState::new(Arc::new(Config::default()), &ApiKeys::default())
            .expect("should create state");
        assert!(state.generator().sources().is_empty());
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = AppState::new(Arc::new(Config::default()), &ApiKeys::default())
            .expect("should create state");
        let state2 = state.clone();
        assert_eq!(state2.config().server.host, "0.0.0.0");
    }

    #[tokio::test]
    async fn test_panic_response_is_json_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Failed to generate quiz");
        assert_eq!(body["details"], "boom");
    }
}
