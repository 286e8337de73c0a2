use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use latency_monitor::{scheduler, server, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "latency_monitor=info,tower_http=info".into()),
        )
        .init();

    // ── 1. Configuration (fatal before anything binds) ──────────
    let config = Config::from_env().context("invalid configuration")?;
    let http_port = config.http_port;

    // ── 2. Build shared state ───────────────────────────────────
    let state = Arc::new(AppState::new(config).context("failed to register metrics")?);

    // ── 3. Start the measurement loop ───────────────────────────
    scheduler::spawn(
        state.config.clone(),
        state.store.clone(),
        state.metrics.clone(),
    );

    // ── 4. Bind & serve ─────────────────────────────────────────
    let app = server::create_router(state.clone());
    let addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        %addr,
        probe_target = %state.config.target(),
        "Network Latency Monitor listening"
    );

    axum::serve(listener, app)
        .await
        .context("server exited with error")
}
