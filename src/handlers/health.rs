//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Providers with a configured key, in fallback order
    pub providers: Vec<&'static str>,
}

/// Health check handler
///
/// Always 200. An empty `providers` list means every quiz request will
/// fail with a missing-key error.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let providers = state
        .generator()
        .sources()
        .iter()
        .map(|s| s.as_str())
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            providers,
        }),
    )
}
