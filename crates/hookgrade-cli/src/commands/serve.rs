//! `hookgrade serve` -- run the HTTP API.
//!
//! # Lifecycle
//!
//! ```text
//! 1. Load config, apply --host/--port overrides
//! 2. Build the quota gate, backend chain and brief generator
//! 3. Bind the listener and serve /api/*
//! 4. Wait for Ctrl+C, then drain in-flight requests and exit
//! ```
//!
//! # Example
//!
//! ```text
//! hookgrade serve
//! hookgrade serve --port 8080 --config /path/to/config.json
//! ```

use clap::Args;
use hookgrade_services::api::{ApiState, build_router};
use hookgrade_types::config::Config;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::load_config;

/// Arguments for the `hookgrade serve` subcommand.
#[derive(Args)]
pub struct ServeArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(mut config: Config, args: &ServeArgs) -> Config {
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
}

/// Run the `serve` command.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);

    let state = ApiState::from_config(&config);
    let backends = state.grading.chain().names().join(", ");
    if state.grading.chain().is_empty() {
        warn!("no grading backends enabled, every grade will be the fallback result");
    }
    let router = build_router(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!(
        addr = %listener.local_addr()?,
        backends = %backends,
        quota_limit = config.quota.limit,
        quota_window_secs = config.quota.window_secs,
        "hookgrade listening -- press Ctrl+C to stop"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
