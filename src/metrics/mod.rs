pub mod export;
pub mod registry;

pub use registry::MetricsRegistry;

/// Upper bounds (ms) of the connect-latency histogram buckets.
/// Chosen for typical internet round trips.
pub const LATENCY_BUCKETS_MS: &[f64] = &[
    1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 400.0, 800.0, 1600.0, 3200.0,
];
