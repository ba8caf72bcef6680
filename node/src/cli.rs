//! # CLI Interface
//!
//! Defines the command-line argument structure for `strata-node` using
//! `clap` derive. Supports two subcommands: `run` and `version`.

use clap::{Parser, Subcommand};

/// Strata ledger node.
///
/// Hosts a single in-memory chain behind a WebSocket/REST API: clients
/// can replace the chain, mine reward blocks onto it, and validate it,
/// and every connected socket sees new blocks as they are appended.
#[derive(Parser, Debug)]
#[command(
    name = "strata-node",
    about = "Strata ledger node",
    version,
    propagate_version = true
)]
pub struct StrataNodeCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Strata node binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the node.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Port for the WebSocket and REST API.
    #[arg(long, env = "STRATA_RPC_PORT", default_value_t = 9341)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "STRATA_METRICS_PORT", default_value_t = 9342)]
    pub metrics_port: u16,

    /// Hex-encoded Ed25519 secret key for the miner wallet.
    ///
    /// Mining rewards are addressed to this wallet. When omitted, a fresh
    /// keypair is generated at startup.
    /// **Never pass this flag in production** — use the environment or a vault.
    #[arg(long, env = "STRATA_MINER_KEY")]
    pub miner_key: Option<String>,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "STRATA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}
