use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::metrics::export;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router`: read-only status routes, the scrape
/// endpoint, a JSON 404 fallback and the global middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Status ──────────────────────────────────────────────
        .route("/", get(handlers::status::root))
        .route("/latency", get(handlers::status::get_latency))
        .route("/health", get(handlers::status::health))
        // ── Metrics ─────────────────────────────────────────────
        .route("/metrics", get(export::get_metrics))
        .fallback(handlers::not_found)
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
