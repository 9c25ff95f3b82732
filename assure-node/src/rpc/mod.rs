//! JSON-RPC server.

pub mod devnet;
pub mod operations;
pub mod pools;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use jsonrpsee::server::{ServerBuilder, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;
use serde_json::json;
use tokio::sync::RwLock;

use assure_core::{address_from_hex, Address, U256};
use assure_state::{ErrorKind, ManualClock, StateError};

use crate::devnet::DevnetConfig;
use crate::node::NodeProtocol;

/// Shared state for RPC handlers.
pub struct RpcState {
    /// Protocol behind a single writer lock.
    pub protocol: Arc<RwLock<NodeProtocol>>,

    /// Manual clock handle (if the node runs on one).
    pub clock: Option<ManualClock>,

    /// Devnet configuration (if enabled).
    pub devnet: Option<DevnetConfig>,
}

impl RpcState {
    /// Create new RPC state.
    pub fn new(
        protocol: Arc<RwLock<NodeProtocol>>,
        clock: Option<ManualClock>,
        devnet: Option<DevnetConfig>,
    ) -> Self {
        Self {
            protocol,
            clock,
            devnet,
        }
    }
}

/// Build the complete RPC module with all methods.
pub fn build_rpc_module(state: Arc<RpcState>) -> anyhow::Result<RpcModule<Arc<RpcState>>> {
    let mut module = RpcModule::new(state);

    // Register signed protocol operations
    operations::register_methods(&mut module)?;

    // Register pool queries
    pools::register_methods(&mut module)?;

    // Register devnet controls
    devnet::register_methods(&mut module)?;

    Ok(module)
}

/// RPC server handle with local address.
pub struct RpcServerHandle {
    /// The server handle for shutdown.
    handle: ServerHandle,
    /// The local address the server is bound to.
    local_addr: SocketAddr,
}

impl RpcServerHandle {
    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the server.
    pub fn stop(&self) -> Result<(), anyhow::Error> {
        self.handle
            .stop()
            .map_err(|e| anyhow::anyhow!("Failed to stop server: {:?}", e))
    }
}

/// Start the JSON-RPC server.
pub async fn start_rpc_server(
    addr: SocketAddr,
    state: Arc<RpcState>,
) -> anyhow::Result<RpcServerHandle> {
    let server = ServerBuilder::default().build(addr).await?;
    let local_addr = server.local_addr()?;

    let module = build_rpc_module(state)?;

    tracing::info!("Starting JSON-RPC server on {}", local_addr);

    let handle = server.start(module);

    Ok(RpcServerHandle { handle, local_addr })
}

// === Error Codes ===

/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Method exists but is disabled on this node.
pub const METHOD_DISABLED: i32 = -32601;

/// Map a protocol error to a JSON-RPC error. The error class travels in
/// `data.kind`.
pub fn state_error(err: StateError) -> ErrorObjectOwned {
    let kind = err.kind();
    let code = match kind {
        ErrorKind::NotFound => -32001,
        ErrorKind::Unauthorized => -32002,
        ErrorKind::IllegalTransition => -32003,
        ErrorKind::InsufficientFunds => -32004,
        ErrorKind::CapacityExceeded => -32005,
        ErrorKind::ExternalCallFailed => -32006,
        ErrorKind::DuplicateName => -32007,
        ErrorKind::InvalidArgument => -32008,
        ErrorKind::ArithmeticOverflow => -32009,
    };
    ErrorObjectOwned::owned(code, err.to_string(), Some(json!({ "kind": kind.name() })))
}

/// Build an invalid-params error.
pub fn invalid_params(message: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INVALID_PARAMS, message.into(), None::<()>)
}

// === Parameter Helpers ===

/// Parse a hex address (optional 0x prefix).
pub fn parse_address(text: &str) -> Result<Address, ErrorObjectOwned> {
    address_from_hex(text).map_err(|e| invalid_params(e.to_string()))
}

/// Parse an amount: 0x-prefixed hex or decimal.
pub fn parse_u256(text: &str) -> Result<U256, ErrorObjectOwned> {
    U256::parse_amount(text).ok_or_else(|| invalid_params(format!("invalid amount: {text}")))
}

/// Format an amount as 0x-prefixed, zero-padded hex.
pub fn format_u256(value: &U256) -> String {
    format!("0x{:064x}", value)
}
