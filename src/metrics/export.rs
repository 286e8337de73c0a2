use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

use crate::handlers::AppError;
use crate::AppState;

// ─── GET /metrics ────────────────────────────────────────────────
/// Pull endpoint for a Prometheus scraper.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.export().map_err(|e| {
        tracing::warn!(error = %e, "could not encode metrics");
        AppError::Internal(format!("metrics encoding failed: {e}"))
    })?;

    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body))
}
