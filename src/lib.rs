use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod probe;
pub mod scheduler;
pub mod server;
pub mod store;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Read once at startup, never mutated.
    pub config: Arc<Config>,

    /// Latest measurement — the scheduler writes, handlers take snapshots.
    pub store: Arc<store::LatencyStore>,

    /// Prometheus collectors fed by the scheduler, rendered by `/metrics`.
    pub metrics: Arc<metrics::MetricsRegistry>,
}

pub use config::{Config, ConfigError};

impl AppState {
    /// Fresh state with an empty store and zeroed collectors.
    pub fn new(config: Config) -> Result<Self, prometheus::Error> {
        let metrics = metrics::MetricsRegistry::new(&config.target_host, config.target_port)?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store::LatencyStore::new()),
            metrics: Arc::new(metrics),
        })
    }
}
