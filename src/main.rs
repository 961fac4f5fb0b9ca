//! Capture list service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌──────────────────────────────────────────────┐
//!     ───────────────────────┼─▶ request id → trace → security headers      │
//!                            │        │                                     │
//!                            │        ▼                                     │
//!                            │   pipeline: auth → body → sanitize →         │
//!                            │             session → csrf → context         │
//!                            │        │                                     │
//!                            │        ▼                                     │
//!                            │   handlers: GET / · POST / · POST /delete/i  │
//!                            │        │                                     │
//!                            │        ▼                                     │
//!                            │   list repository ⇄ codec ⇄ document store ──┼──▶ Dropbox
//!                            └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use capture_list::config::{load_config, load_from_env};
use capture_list::observability::logging;
use capture_list::{lifecycle, store, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "capture-list")]
#[command(about = "Authenticated capture list backed by a remote JSON document", long_about = None)]
struct Cli {
    /// TOML configuration file. Without it, defaults plus environment are used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    if cli.check {
        println!("Configuration OK");
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!("capture-list v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = ?config.store.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let document_store = store::from_config(&config.store)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, document_store)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
