use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// A success older than this many seconds no longer counts as healthy.
/// Independent of the configured check interval.
pub const HEALTH_WINDOW_SECS: i64 = 30;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe holder of the latest measurement.
/// The scheduler calls `record_*()`, HTTP handlers call `snapshot()`.
#[derive(Default)]
pub struct LatencyStore {
    inner: Mutex<MeasurementSnapshot>,
}

/// Copy of the store's fields as seen at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSnapshot {
    /// Last known good latency; survives later failures.
    pub latest_latency_ms: Option<f64>,
    pub last_success_time: Option<DateTime<Utc>>,
    /// Outcome of the most recent attempt, cleared by a success.
    pub last_error_message: Option<String>,
    pub last_error_time: Option<DateTime<Utc>>,
}

// ─── LatencyStore impl ───────────────────────────────────────────

impl LatencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, latency_ms: f64) {
        self.record_success_at(latency_ms, Utc::now());
    }

    pub fn record_failure(&self, message: impl Into<String>) {
        self.record_failure_at(message, Utc::now());
    }

    pub fn record_success_at(&self, latency_ms: f64, at: DateTime<Utc>) {
        let mut s = self.inner.lock();
        s.latest_latency_ms = Some(latency_ms);
        s.last_success_time = Some(at);
        s.last_error_message = None;
        s.last_error_time = None;
    }

    /// Latency fields are left alone.
    pub fn record_failure_at(&self, message: impl Into<String>, at: DateTime<Utc>) {
        let message = message.into();
        let mut s = self.inner.lock();
        s.last_error_message = Some(message);
        s.last_error_time = Some(at);
    }

    pub fn snapshot(&self) -> MeasurementSnapshot {
        self.inner.lock().clone()
    }
}

// ─── MeasurementSnapshot impl ────────────────────────────────────

impl MeasurementSnapshot {
    /// Healthy iff a success exists and is strictly younger than
    /// [`HEALTH_WINDOW_SECS`] at `now`.
    pub fn is_healthy_at(&self, now: DateTime<Utc>) -> bool {
        match (self.latest_latency_ms, self.last_success_time) {
            (Some(_), Some(at)) => now - at < TimeDelta::seconds(HEALTH_WINDOW_SECS),
            _ => false,
        }
    }

    pub fn last_success_unix(&self) -> Option<f64> {
        self.last_success_time.map(unix_seconds)
    }

    pub fn last_error_unix(&self) -> Option<f64> {
        self.last_error_time.map(unix_seconds)
    }
}

/// Seconds since the epoch with microsecond precision.
fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}
