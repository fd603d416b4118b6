use std::sync::Arc;

use anyhow::Context;
use tracing::info;

mod config;
mod error;
mod handlers;
mod impala;
mod metrics;
mod middleware;
mod server;
mod telemetry;
#[cfg(test)]
mod test_support;

use config::Config;
use impala::ImpalaClient;
use metrics::Exporter;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Immutable after startup; every scrape borrows it for a full re-fetch.
    pub exporter: Exporter,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let config = Config::load();

    // ── 1. Resolve targets ───────────────────────────────────────
    let targets = config.targets()?;

    // ── 2. Build the upstream client ─────────────────────────────
    let client =
        ImpalaClient::new(config.timeout()).context("failed to build the Impala HTTP client")?;

    // ── 3. Build shared state ────────────────────────────────────
    let state = Arc::new(AppState {
        exporter: Exporter::new(
            targets,
            client,
            config.max_concurrent_targets(),
            config.scrape_timeout(),
        ),
    });
    let servers: Vec<String> = state
        .exporter
        .targets()
        .iter()
        .map(ToString::to_string)
        .collect();

    // ── 4. Build Axum router ─────────────────────────────────────
    let app = server::create_router(state, config.scrape_timeout());

    // ── 5. Bind & serve ──────────────────────────────────────────
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(?servers, "starting server on http://{addr}/metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
