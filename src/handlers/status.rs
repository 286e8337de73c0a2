use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

pub const SERVICE_NAME: &str = "Network Latency Monitor";

// ─── Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
    /// `"host:port"`
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub latency: &'static str,
    pub metrics: &'static str,
    pub health: &'static str,
}

/// Body of `GET /latency`. Unset measurement fields serialize as `null`.
#[derive(Debug, Serialize)]
pub struct LatencyReport {
    pub target_host: String,
    pub target_port: u16,
    pub check_interval_seconds: f64,
    pub connect_timeout_seconds: f64,
    pub latest_latency_ms: Option<f64>,
    pub last_success_unix: Option<f64>,
    pub last_error_message: Option<String>,
    pub last_error_unix: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub target: String,
    pub last_successful_measurement: Option<f64>,
    pub last_error: Option<String>,
}

// ─── GET / ───────────────────────────────────────────────────────

pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            latency: "/latency",
            metrics: "/metrics",
            health: "/health",
        },
        target: state.config.target(),
    })
}

// ─── GET /latency ────────────────────────────────────────────────

pub async fn get_latency(State(state): State<Arc<AppState>>) -> Json<LatencyReport> {
    let config = &state.config;
    let snapshot = state.store.snapshot();

    Json(LatencyReport {
        target_host: config.target_host.clone(),
        target_port: config.target_port,
        check_interval_seconds: config.check_interval.as_secs_f64(),
        connect_timeout_seconds: config.connect_timeout.as_secs_f64(),
        latest_latency_ms: snapshot.latest_latency_ms,
        last_success_unix: snapshot.last_success_unix(),
        last_error_unix: snapshot.last_error_unix(),
        last_error_message: snapshot.last_error_message,
    })
}

// ─── GET /health ─────────────────────────────────────────────────
/// Always 200; the verdict is in `status`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let snapshot = state.store.snapshot();
    let status = if snapshot.is_healthy_at(Utc::now()) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    Json(HealthReport {
        status,
        target: state.config.target(),
        last_successful_measurement: snapshot.last_success_unix(),
        last_error: snapshot.last_error_message,
    })
}
