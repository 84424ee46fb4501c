//! Prometheus metrics collection for awsquiz
//!
//! This module provides metrics instrumentation for tracking:
//! - Quiz requests by final outcome
//! - Provider attempts by provider and result
//! - Provider call latency
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use crate::providers::{ProviderAttempt, ProviderSource};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Final outcome of a quiz request, as a metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A provider produced a usable quiz
    Success,
    /// The last fallback answered but its result was unusable
    Partial,
    /// The request ended in a 500
    Failure,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Partial => "partial",
            Outcome::Failure => "failure",
        }
    }
}

/// Result of a single provider attempt, as a metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Usable,
    ProviderError,
    ParseError,
    TransportError,
}

impl AttemptResult {
    /// Convert attempt result to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptResult::Usable => "usable",
            AttemptResult::ProviderError => "provider_error",
            AttemptResult::ParseError => "parse_error",
            AttemptResult::TransportError => "transport_error",
        }
    }

    /// Classify an attempt; transport failures win over provider errors
    pub fn of(attempt: &ProviderAttempt) -> Self {
        if attempt.transport_failed {
            AttemptResult::TransportError
        } else if attempt.provider_error.is_some() {
            AttemptResult::ProviderError
        } else if attempt.is_usable() {
            AttemptResult::Usable
        } else {
            AttemptResult::ParseError
        }
    }
}

/// Metrics collector for awsquiz
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    provider_attempts: IntCounterVec,
    provider_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 3 outcomes
        let requests_total = IntCounterVec::new(
            Opts::new(
                "awsquiz_requests_total",
                "Total number of quiz requests by outcome",
            ),
            &["outcome"],
        )?;

        // Cardinality: 2 providers x 4 results
        let provider_attempts = IntCounterVec::new(
            Opts::new(
                "awsquiz_provider_attempts_total",
                "Total provider calls by provider and result",
            ),
            &["provider", "result"],
        )?;

        let provider_duration = HistogramVec::new(
            HistogramOpts::new(
                "awsquiz_provider_duration_ms",
                "Provider call latency in milliseconds",
            )
            .buckets(vec![
                100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 15000.0, 30000.0,
            ]),
            &["provider"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(provider_attempts.clone()))?;
        registry.register(Box::new(provider_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            provider_attempts,
            provider_duration,
        })
    }

    /// Record the final outcome of a quiz request
    pub fn record_request(&self, outcome: Outcome) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record one provider attempt
    pub fn record_attempt(
        &self,
        provider: ProviderSource,
        result: AttemptResult,
    ) -> Result<(), prometheus::Error> {
        self.provider_attempts
            .get_metric_with_label_values(&[provider.as_str(), result.as_str()])?
            .inc();
        Ok(())
    }

    /// Record provider call latency
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_ms` is NaN, infinite or negative; such
    /// values would corrupt the histogram.
    pub fn record_provider_duration(
        &self,
        provider: ProviderSource,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                duration_ms
            )));
        }

        self.provider_duration
            .get_metric_with_label_values(&[provider.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    /// Current count of requests with the given outcome
    pub fn request_count(&self, outcome: Outcome) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[outcome.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Current count of attempts for a provider/result pair
    pub fn attempt_count(&self, provider: ProviderSource, result: AttemptResult) -> u64 {
        self.provider_attempts
            .get_metric_with_label_values(&[provider.as_str(), result.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                metric_family_count = metric_families.len(),
                "Prometheus text encoder failed"
            );
            e
        })?;

        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("Metrics output is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metrics_new_registers() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_request(Outcome::Success).unwrap();
        let output = metrics.gather().expect("should gather");
        assert!(output.contains("awsquiz_requests_total"));
    }

    #[test]
    fn test_record_request_increments() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request(Outcome::Partial).unwrap();
        metrics.record_request(Outcome::Partial).unwrap();
        assert_eq!(metrics.request_count(Outcome::Partial), 2);
        assert_eq!(metrics.request_count(Outcome::Success), 0);
    }

    #[test]
    fn test_record_attempt_labels() {
        let metrics = Metrics::new().unwrap();
        metrics
            .record_attempt(ProviderSource::Gemini, AttemptResult::ParseError)
            .unwrap();
        let output = metrics.gather().unwrap();
        assert!(output.contains(r#"provider="gemini""#));
        assert!(output.contains(r#"result="parse_error""#));
    }

    #[test]
    fn test_record_duration_rejects_nan() {
        let metrics = Metrics::new().unwrap();
        assert!(
            metrics
                .record_provider_duration(ProviderSource::OpenAi, f64::NAN)
                .is_err()
        );
        assert!(
            metrics
                .record_provider_duration(ProviderSource::OpenAi, -1.0)
                .is_err()
        );
        assert!(
            metrics
                .record_provider_duration(ProviderSource::OpenAi, 12.5)
                .is_ok()
        );
    }

    #[test]
    fn test_attempt_result_classification() {
        let usable = ProviderAttempt::from_content(
            ProviderSource::OpenAi,
            r#"{"question":"Q","options":["A","B","C","D"],"answer":"A"}"#.into(),
            json!({}),
            None,
        );
        assert_eq!(AttemptResult::of(&usable), AttemptResult::Usable);

        let unparsable =
            ProviderAttempt::from_content(ProviderSource::OpenAi, "nope".into(), json!({}), None);
        assert_eq!(AttemptResult::of(&unparsable), AttemptResult::ParseError);

        let reported = ProviderAttempt::from_content(
            ProviderSource::OpenAi,
            String::new(),
            json!({}),
            Some(json!({"message": "quota"})),
        );
        assert_eq!(AttemptResult::of(&reported), AttemptResult::ProviderError);
    }
}
