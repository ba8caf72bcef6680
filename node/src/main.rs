// Copyright (c) 2026 Strata Contributors. MIT License.
// See LICENSE for details.

//! # Strata Node
//!
//! Entry point for the `strata-node` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the WebSocket/REST API
//! in front of a single in-memory chain.
//!
//! The binary supports two subcommands:
//!
//! - `run`     — start the node
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use strata_ledger::crypto::keys::Keypair;
use strata_ledger::wallet::Wallet;

use cli::{Commands, StrataNodeCli};
use logging::LogFormat;
use metrics::NodeMetrics;

/// Broadcast channel capacity for live block events.
/// Large enough to absorb short bursts without dropping events for
/// connected WebSocket clients.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = StrataNodeCli::parse();

    match cli.command {
        Commands::Run(args) => run_node(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full node: API server and metrics endpoint.
async fn run_node(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "strata_node=info,strata_ledger=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        rpc_port = args.rpc_port,
        metrics_port = args.metrics_port,
        "starting strata-node"
    );

    // --- Miner wallet ---
    let miner = match &args.miner_key {
        Some(hex_key) => {
            let keypair =
                Keypair::from_hex(hex_key).context("invalid miner key, expected 64 hex chars")?;
            Wallet::new(keypair)
        }
        None => Wallet::generate(),
    };
    tracing::info!(address = %miner.address(), "miner wallet ready");

    // --- Metrics ---
    let node_metrics = Arc::new(NodeMetrics::new());

    // --- Application state ---
    let app_state = api::AppState::new(miner, Arc::clone(&node_metrics), EVENT_CHANNEL_CAPACITY);

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.rpc_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind RPC listener on {}", api_addr))?;
    tracing::info!("RPC/API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&node_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("strata-node stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("strata-node {}", env!("CARGO_PKG_VERSION"));
    println!("protocol    {}", strata_ledger::config::PROTOCOL_VERSION);
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
