//! API gateway binary.
//!
//! Startup order: tracing first, then configuration, then the listener, then
//! the server. The gateway fronts two backend services:
//!
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!                    │                 GATEWAY                   │
//!   Client ─────────▶│  request id → metrics → admission gate    │
//!                    │        │                                  │
//!                    │        ├── /nba/*, /recipes/*  ──────────▶│──▶ backends
//!                    │        ├── /recipe-* (aggregate + merge) ─▶│──▶ both
//!                    │        └── /status (cache-aside)          │
//!                    │        all failures → error normalizer    │
//!                    └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_gateway::config::{load_config, GatewayConfig};
use api_gateway::http::HttpServer;
use api_gateway::lifecycle::Shutdown;
use api_gateway::observability::metrics;

#[derive(Parser)]
#[command(name = "api-gateway", about = "Gateway for the sports-data and recipes services")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        sports_url = %config.backends.sports_url,
        recipes_url = %config.backends.recipes_url,
        max_concurrent_requests = config.admission.max_concurrent_requests,
        upstream_timeout_ms = config.timeouts.upstream_ms,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).await?;

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
