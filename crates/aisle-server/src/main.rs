#![doc = include_str!("../README.md")]

mod server;

use anyhow::Context;
use clap::Parser;
use server::config::{CliArgs, ServerConfig};
use server::{dispatch, telemetry, view};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    telemetry::init();

    let grid = Arc::new(aisle::SeatGrid::new(config.dims));

    let (event_tx, event_rx) = mpsc::channel(view::EVENT_BUFFER);
    if config.view {
        tokio::spawn(view::run(Arc::clone(&grid), event_rx));
    } else {
        // With the receiver gone, handler notifications become no-ops.
        drop(event_rx);
    }

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        addr = %config.listen_addr,
        grid = %config.dims,
        "seat reservation server listening"
    );

    dispatch::run(
        listener,
        grid,
        event_tx,
        shutdown_signal(),
        config.drain_timeout,
    )
    .await;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
