//! requires-https
//!
//! Plaintext listener that only lets https traffic through.
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ listener ─▶ trace ─▶ timeout ─▶ guard ──┐  │
//!                           │                                   │       │  │
//!     302 / 401             │                                   │       ▼  │
//!     ◀─────────────────────┼───────────────────────────────────┘  handler │
//!                           └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use requires_https::config::{load_config, AppConfig};
use requires_https::observability::{logging, metrics};
use requires_https::HttpServer;

#[derive(Parser)]
#[command(name = "requires-https")]
#[command(about = "Redirect or reject requests that did not arrive over https", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level)?;

    tracing::info!("requires-https v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        fixed_redirect = config.guard.fixed_redirect_target().unwrap_or("-"),
        force_401 = config.guard.force_401,
        https_port = config.guard.https_port_number,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(config).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
