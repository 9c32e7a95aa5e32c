//! Condition-Based Reverse Proxy
//!
//! Splits traffic between statically configured origins based on the
//! `proxy_condition` field of the inbound request body.
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               CONDITION PROXY                 │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│  body     │──▶│ routing  │  │
//!                    │  │ server  │   │ capture   │   │  engine  │  │
//!                    │  └─────────┘   └───────────┘   └────┬─────┘  │
//!                    │                                     │        │
//!                    │                                     ▼        │
//!   Client Response  │  ┌─────────┐               ┌──────────────┐  │     Origin
//!   ◀────────────────┼──│response │◀──────────────│  forwarder   │◀─┼──── A / B /
//!                    │  │  relay  │               │ (hyper client)│ │     default
//!                    │  └─────────┘               └──────────────┘  │
//!                    │                                               │
//!                    │  config · observability · lifecycle           │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use condition_proxy::config::{loader, ProxyConfig};
use condition_proxy::http::HttpServer;
use condition_proxy::lifecycle::{signals, Shutdown};
use condition_proxy::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "condition-proxy")]
#[command(about = "Condition-based HTTP reverse proxy", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Environment variables
    /// (PORT, A_CONDITION_URL, B_CONDITION_URL, DEFAULT_CONDITION_URL)
    /// override file values.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration: file if given, defaults otherwise, env on top
    let config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => ProxyConfig::default(),
    };
    let config = loader::apply_env_overrides(config);

    logging::init(&config.observability.log_level);

    tracing::info!("condition-proxy v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        a_condition_url = %config.origins.a_url,
        b_condition_url = %config.origins.b_url,
        default_condition_url = %config.origins.default_url,
        "Configuration loaded"
    );

    // Bind TCP listener; failure here is the one fatal startup error
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
