//! LuminaKraft launcher gateway
//!
//! Authenticated, rate-limited HTTP front for launcher data and the
//! CurseForge API.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                  LAUNCHER GATEWAY                     │
//!                     │                                                       │
//!  Launcher request   │  ┌────────┐   ┌──────────┐   ┌────────────┐          │
//!  ───────────────────┼─▶│  http  │──▶│ identity │──▶│ rate limit │──┐       │
//!                     │  │ server │   │ resolver │   │ (per id)   │  │       │
//!                     │  └────────┘   └────┬─────┘   └────────────┘  │       │
//!                     │                    │ federated → profile API │       │
//!                     │                    │ self-issued → local     ▼       │
//!                     │                    │                  ┌──────────┐   │
//!  Response           │                    │                  │   api    │   │
//!  ◀──────────────────┼────────────────────┴──────────────────│ handlers │   │
//!                     │                                       └────┬─────┘   │
//!                     │                          data store ◀──────┤         │
//!                     │                          curseforge ◀──────┘         │
//!                     │                                                       │
//!                     │  config · observability · lifecycle (cross-cutting)   │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use launcher_gateway::config::loader;
use launcher_gateway::data::DataWatcher;
use launcher_gateway::lifecycle::{build_state, signals, Shutdown};
use launcher_gateway::observability::{logging, metrics};
use launcher_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "launcher-gateway", version, about)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env is normal outside development.
    let _ = dotenvy::dotenv();

    let config = loader::load(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "launcher-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let watch_data = config.data.watch;
    let state = build_state(config)?;

    // Held for the life of the process; dropping it stops the watch.
    let _watcher = if watch_data {
        match DataWatcher::new(state.data.dir(), state.data.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(error = %e, "Data hot reload disabled");
                None
            }
        }
    } else {
        None
    };

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { signals::forward_signals(&shutdown).await });
    }

    HttpServer::new(state).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
