use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::metrics::MetricsRegistry;
use crate::probe;
use crate::store::LatencyStore;

// ─── Public entry points ─────────────────────────────────────────

/// Spawns the measurement loop as a detached Tokio task.
/// It runs until the process exits; the handle is only useful in tests.
pub fn spawn(
    config: Arc<Config>,
    store: Arc<LatencyStore>,
    metrics: Arc<MetricsRegistry>,
) -> JoinHandle<()> {
    tokio::spawn(run(config, store, metrics))
}

/// Probe, record, sleep, forever. Failed probes are recorded and the
/// loop carries on; the sleep starts after the probe finishes.
pub async fn run(config: Arc<Config>, store: Arc<LatencyStore>, metrics: Arc<MetricsRegistry>) {
    info!(
        probe_target = %config.target(),
        interval = ?config.check_interval,
        timeout = ?config.connect_timeout,
        "latency measurement started"
    );

    loop {
        probe_once(&config, &store, &metrics).await;
        tokio::time::sleep(config.check_interval).await;
    }
}

// ─── One probe cycle ─────────────────────────────────────────────

/// Measure once and publish the outcome. Returns the latency on success.
pub async fn probe_once(
    config: &Config,
    store: &LatencyStore,
    metrics: &MetricsRegistry,
) -> Option<f64> {
    match probe::measure(&config.target_host, config.target_port, config.connect_timeout).await {
        Ok(latency_ms) => {
            store.record_success(latency_ms);
            metrics.record_success(latency_ms);
            debug!(latency_ms, "probe succeeded");
            Some(latency_ms)
        }
        Err(e) => {
            let message = e.to_string();
            warn!(probe_target = %config.target(), error = %message, "probe failed");
            store.record_failure(message);
            metrics.record_failure();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn config_for(port: u16, interval: Duration) -> Config {
        Config {
            target_host: "127.0.0.1".into(),
            target_port: port,
            check_interval: interval,
            connect_timeout: Duration::from_secs(1),
            http_port: 0,
        }
    }

    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn success_updates_store_and_metrics() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = config_for(listener.local_addr().unwrap().port(), Duration::ZERO);
        let store = LatencyStore::new();
        let metrics = MetricsRegistry::new("127.0.0.1", config.target_port).unwrap();
        store.record_failure("earlier failure");

        let latency = probe_once(&config, &store, &metrics).await;

        let s = store.snapshot();
        assert!(latency.is_some());
        assert_eq!(s.latest_latency_ms, latency);
        assert_eq!(s.last_error_message, None);
        assert_eq!(metrics.success_count(), 1);
        assert_eq!(metrics.failure_count(), 0);
        assert!(metrics.export().unwrap().contains("network_latency_ms{"));
    }

    #[tokio::test]
    async fn failure_is_recorded_not_raised() {
        let config = config_for(closed_port().await, Duration::ZERO);
        let store = LatencyStore::new();
        let metrics = MetricsRegistry::new("127.0.0.1", config.target_port).unwrap();

        assert_eq!(probe_once(&config, &store, &metrics).await, None);

        let s = store.snapshot();
        assert_eq!(s.latest_latency_ms, None);
        assert!(s.last_error_time.is_some());
        let message = s.last_error_message.unwrap();
        assert!(
            message.starts_with("ConnectError: ") || message.starts_with("TimeoutError: "),
            "{message}"
        );
        assert_eq!(metrics.failure_count(), 1);
        assert_eq!(metrics.success_count(), 0);
    }

    #[tokio::test]
    async fn loop_keeps_running_after_failures() {
        let config = Arc::new(config_for(closed_port().await, Duration::from_millis(20)));
        let store = Arc::new(LatencyStore::new());
        let metrics = Arc::new(MetricsRegistry::new("127.0.0.1", config.target_port).unwrap());

        let handle = spawn(config, store.clone(), metrics.clone());

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while metrics.failure_count() < 3 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(!handle.is_finished());
        assert!(metrics.failure_count() >= 3);
        assert!(store.snapshot().last_error_message.is_some());
        handle.abort();
    }
}
