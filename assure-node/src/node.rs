//! Node orchestrator.
//!
//! Wires the protocol to its in-memory collaborators, serves it over
//! JSON-RPC, and persists the pool store across restarts.

use std::sync::Arc;

use tokio::sync::RwLock;

use assure_core::{address_to_hex, Tick};
use assure_state::{
    Clock, ManualClock, ManualPolicyOracle, MemoryLedger, MemoryPoolStore, PoolReader, Protocol,
    StaticExpertList, SystemClock,
};

use crate::cli::TickSource;
use crate::config::NodeConfig;
use crate::rpc::{self, RpcState};
use crate::shutdown::{shutdown_channel, wait_for_shutdown_signal, ShutdownGuard, ShutdownTx};
use crate::snapshot::{load_snapshot, save_snapshot};

/// Tick source selected at start.
#[derive(Clone, Debug)]
pub enum NodeClock {
    /// Unix seconds.
    System(SystemClock),
    /// Devnet counter; clones share the same tick.
    Manual(ManualClock),
}

impl NodeClock {
    /// Build the clock for a configuration.
    pub fn from_config(config: &NodeConfig) -> Self {
        match config.tick_source {
            TickSource::System => NodeClock::System(SystemClock),
            TickSource::Manual => {
                let start = config.devnet.as_ref().map(|d| d.start_tick).unwrap_or(0);
                NodeClock::Manual(ManualClock::new(start))
            }
        }
    }

    /// Handle to the manual counter, if this clock has one.
    pub fn manual(&self) -> Option<ManualClock> {
        match self {
            NodeClock::System(_) => None,
            NodeClock::Manual(clock) => Some(clock.clone()),
        }
    }
}

impl Clock for NodeClock {
    fn now(&self) -> Tick {
        match self {
            NodeClock::System(clock) => clock.now(),
            NodeClock::Manual(clock) => clock.now(),
        }
    }
}

/// Protocol as run by the node.
pub type NodeProtocol = Protocol<MemoryLedger, StaticExpertList, ManualPolicyOracle, NodeClock>;

/// The main node structure.
pub struct Node {
    /// Node configuration.
    config: NodeConfig,

    /// Protocol state behind a single writer lock.
    protocol: Arc<RwLock<NodeProtocol>>,

    /// Manual clock handle (devnet tick control).
    clock: Option<ManualClock>,

    /// Shutdown signal sender.
    shutdown_tx: ShutdownTx,
}

impl Node {
    /// Create a new node with the given configuration.
    pub async fn new(config: NodeConfig) -> anyhow::Result<Self> {
        let store = if config.is_persistent() {
            std::fs::create_dir_all(&config.data_dir)?;
            tracing::info!("Data directory: {:?}", config.data_dir);
            match load_snapshot(&config.data_dir)? {
                Some(store) => {
                    tracing::info!("Loaded snapshot with {} pools", store.pools_len());
                    store
                }
                None => MemoryPoolStore::new(),
            }
        } else {
            tracing::info!("Running without persistence (no data directory)");
            MemoryPoolStore::new()
        };

        let clock = NodeClock::from_config(&config);
        let manual = clock.manual();
        let escrow = config.escrow_address();
        tracing::info!("Escrow account: {}", address_to_hex(&escrow));

        let protocol = Protocol::new(
            MemoryLedger::new(),
            StaticExpertList::new(config.experts.iter().copied()),
            ManualPolicyOracle::new(),
            clock,
            escrow,
        )
        .with_store(store);

        let (shutdown_tx, _) = shutdown_channel();

        Ok(Self {
            config,
            protocol: Arc::new(RwLock::new(protocol)),
            clock: manual,
            shutdown_tx,
        })
    }

    /// Run the node until a shutdown signal arrives.
    pub async fn run(&self) -> anyhow::Result<()> {
        tracing::info!("Starting Assure node...");
        tracing::info!("  RPC address: {}", self.config.rpc_addr);
        tracing::info!("  Tick source: {:?}", self.config.tick_source);
        tracing::info!("  Devnet mode: {}", self.config.is_devnet());

        let rpc_handle = self.start_rpc().await?;

        let mut guard = ShutdownGuard::new(&self.shutdown_tx);
        tokio::select! {
            _ = wait_for_shutdown_signal() => {
                let _ = self.shutdown_tx.send(());
            }
            _ = guard.wait() => {}
        }

        tracing::info!("Shutting down node...");

        rpc_handle.stop()?;
        tracing::info!("RPC server stopped");

        self.save().await?;

        tracing::info!("Node shutdown complete");
        Ok(())
    }

    /// Start the RPC server and return the handle.
    /// The handle provides the local_addr() for the actual bound port.
    pub async fn start_rpc(&self) -> anyhow::Result<rpc::RpcServerHandle> {
        let state = Arc::new(RpcState::new(
            self.protocol.clone(),
            self.clock.clone(),
            self.config.devnet.clone(),
        ));

        let handle = rpc::start_rpc_server(self.config.rpc_addr, state).await?;
        tracing::info!("RPC server listening on {}", handle.local_addr());
        Ok(handle)
    }

    /// Write the pool snapshot, if persistence is enabled.
    pub async fn save(&self) -> anyhow::Result<()> {
        if !self.config.is_persistent() {
            return Ok(());
        }
        let protocol = self.protocol.read().await;
        save_snapshot(&self.config.data_dir, protocol.store())?;
        tracing::info!(
            "Saved snapshot with {} pools to {:?}",
            protocol.store().pools_len(),
            self.config.data_dir
        );
        Ok(())
    }

    /// Sender that stops [`Node::run`].
    pub fn shutdown_handle(&self) -> ShutdownTx {
        self.shutdown_tx.clone()
    }

    /// Get the protocol (for testing).
    pub fn protocol(&self) -> &Arc<RwLock<NodeProtocol>> {
        &self.protocol
    }

    /// Get the node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}
