//! Error types for awsquiz
//!
//! All errors implement `IntoResponse` for Axum handlers and render as
//! `{ "error": ..., "details"?: ... }`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Missing API keys: set OPENAI_API_KEY and/or GEMINI_API_KEY")]
    MissingApiKeys,

    #[error("Both providers failed or unavailable")]
    ProvidersExhausted { details: String },

    #[error("Failed to generate quiz")]
    Upstream { details: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Diagnostic text attached to the response body, if any
    pub fn details(&self) -> Option<String> {
        match self {
            Self::ProvidersExhausted { details } | Self::Upstream { details } => {
                Some(details.clone())
            }
            Self::ConfigFileRead { source, .. } => Some(source.to_string()),
            Self::ConfigParseFailed { source, .. } => Some(source.to_string()),
            Self::ConfigValidationFailed { reason, .. } => Some(reason.clone()),
            Self::Config(_) | Self::MissingApiKeys | Self::Internal(_) => None,
        }
    }

    /// Response body: `{ "error": ..., "details"?: ... }`
    pub fn body(&self) -> serde_json::Value {
        match self.details() {
            Some(details) => serde_json::json!({
                "error": self.to_string(),
                "details": details,
            }),
            None => serde_json::json!({
                "error": self.to_string(),
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.body())).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
