use prometheus::{
    Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec,
    Opts, Registry, TextEncoder,
};

use super::LATENCY_BUCKETS_MS;

const LABELS: &[&str] = &["target_host", "target_port"];

// ─── Public types ────────────────────────────────────────────────

/// Prometheus collectors for one probe target.
///
/// Each instance owns its own `Registry`, so several can coexist
/// (one per test, typically) without name clashes.
pub struct MetricsRegistry {
    registry: Registry,

    latency: Gauge,
    success: IntCounter,
    failure: IntCounter,
    histogram: Histogram,
}

// ─── MetricsRegistry impl ────────────────────────────────────────

impl MetricsRegistry {
    pub fn new(target_host: &str, target_port: u16) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let port = target_port.to_string();
        let values = [target_host, port.as_str()];

        let latency = GaugeVec::new(
            Opts::new(
                "network_latency_ms",
                "Latest measured TCP connect latency in milliseconds",
            ),
            LABELS,
        )?;
        let success = IntCounterVec::new(
            Opts::new(
                "network_latency_success_total",
                "Number of successful latency measurements",
            ),
            LABELS,
        )?;
        let failure = IntCounterVec::new(
            Opts::new(
                "network_latency_failure_total",
                "Number of failed latency measurements",
            ),
            LABELS,
        )?;
        let histogram = HistogramVec::new(
            HistogramOpts::new(
                "network_latency_histogram_ms",
                "Histogram of observed TCP connect latency in ms",
            )
            .buckets(LATENCY_BUCKETS_MS.to_vec()),
            LABELS,
        )?;

        registry.register(Box::new(latency.clone()))?;
        registry.register(Box::new(success.clone()))?;
        registry.register(Box::new(failure.clone()))?;
        registry.register(Box::new(histogram.clone()))?;

        // Every series exists from the start, so a scrape after a run of
        // failures still lists all four families.
        let latency = latency.get_metric_with_label_values(&values)?;
        let success = success.get_metric_with_label_values(&values)?;
        let failure = failure.get_metric_with_label_values(&values)?;
        let histogram = histogram.get_metric_with_label_values(&values)?;

        Ok(Self {
            registry,
            latency,
            success,
            failure,
            histogram,
        })
    }

    pub fn record_success(&self, latency_ms: f64) {
        self.latency.set(latency_ms);
        self.histogram.observe(latency_ms);
        self.success.inc();
    }

    pub fn record_failure(&self) {
        self.failure.inc();
    }

    /// Render every collector in the text exposition format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_owned()
    }

    pub fn success_count(&self) -> u64 {
        self.success.get()
    }

    pub fn failure_count(&self) -> u64 {
        self.failure.get()
    }
}
