//! Node configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use assure_core::{address_from_hex, Address, KeyPair};

use crate::cli::{Cli, TickSource};
use crate::devnet::DevnetConfig;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Data directory for the pool snapshot. Empty disables persistence.
    pub data_dir: PathBuf,

    /// RPC listen address.
    pub rpc_addr: SocketAddr,

    /// Devnet configuration (if enabled).
    pub devnet: Option<DevnetConfig>,

    /// Addresses the expert registry recognizes at start.
    pub experts: Vec<Address>,

    /// Seed of the escrow account key.
    pub escrow_seed: String,

    /// Clock driving the protocol.
    pub tick_source: TickSource,

    /// Log level.
    pub log_level: String,
}

impl NodeConfig {
    /// Create a node configuration from CLI arguments.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let devnet = if cli.devnet {
            Some(DevnetConfig::default())
        } else {
            None
        };

        let experts = cli
            .experts
            .iter()
            .flatten()
            .map(|hex| address_from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;

        let tick_source = cli.tick_source.unwrap_or(if cli.devnet {
            TickSource::Manual
        } else {
            TickSource::System
        });

        Ok(Self {
            data_dir: cli.expanded_data_dir(),
            rpc_addr: cli.rpc_listen,
            devnet,
            experts,
            escrow_seed: cli.escrow_seed.clone(),
            tick_source,
            log_level: cli.log_level.clone(),
        })
    }

    /// Ledger account holding every deposit and stake.
    pub fn escrow_address(&self) -> Address {
        KeyPair::from_seed(&self.escrow_seed).address()
    }

    /// Check if devnet mode is enabled.
    pub fn is_devnet(&self) -> bool {
        self.devnet.is_some()
    }

    /// Check if the pool snapshot is persisted.
    pub fn is_persistent(&self) -> bool {
        !self.data_dir.as_os_str().is_empty()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("~/.assure"),
            rpc_addr: SocketAddr::from(([127, 0, 0, 1], 9444)),
            devnet: None,
            experts: Vec::new(),
            escrow_seed: "assure-escrow".to_string(),
            tick_source: TickSource::System,
            log_level: "info".to_string(),
        }
    }
}
