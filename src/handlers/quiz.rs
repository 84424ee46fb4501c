//! Quiz endpoint handler
//!
//! Handles `GET|POST /api/quiz`. The request body is ignored.

use crate::generator::QuizOutcome;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use axum::{Extension, extract::State};

/// Generate one quiz question
///
/// Always answers with JSON: 200 when any provider answered (with `quiz: null`
/// and diagnostics if nothing was usable), 500 when no key is configured or
/// nothing was left to fall back to.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> QuizOutcome {
    tracing::info!(
        request_id = %request_id,
        providers = ?state.generator().sources(),
        "Received quiz request"
    );

    state.generator().generate(request_id).await
}
