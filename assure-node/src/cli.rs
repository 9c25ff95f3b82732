//! Command-line argument parsing.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Where the protocol reads the current tick from.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// Unix seconds.
    System,
    /// Advanced only through `devnet_advance`.
    Manual,
}

/// Assure protocol node.
#[derive(Parser, Debug, Clone)]
#[command(name = "assure-node")]
#[command(about = "Assure staking protocol node binary")]
#[command(version)]
pub struct Cli {
    /// Data directory for the pool snapshot. Empty disables persistence.
    #[arg(long, default_value = "~/.assure")]
    pub data_dir: PathBuf,

    /// RPC listen address.
    #[arg(long, default_value = "127.0.0.1:9444")]
    pub rpc_listen: SocketAddr,

    /// Enable devnet mode (manual clock, faucet and oracle controls).
    #[arg(long)]
    pub devnet: bool,

    /// Comma-separated list of expert addresses (hex).
    #[arg(long, value_delimiter = ',')]
    pub experts: Option<Vec<String>>,

    /// Seed the escrow account key is derived from.
    #[arg(long, default_value = "assure-escrow")]
    pub escrow_seed: String,

    /// Tick source. Defaults to manual in devnet mode, system otherwise.
    #[arg(long, value_enum)]
    pub tick_source: Option<TickSource>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Expand the data directory path (handle ~ for home).
    pub fn expanded_data_dir(&self) -> PathBuf {
        let path_str = self.data_dir.to_string_lossy();
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        self.data_dir.clone()
    }
}
