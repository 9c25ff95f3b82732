//! Assure protocol node library.
//!
//! Runs the staking protocol against in-memory collaborators and serves it
//! over JSON-RPC. Used by the `assure-node` binary and by integration tests.

pub mod cli;
pub mod config;
pub mod devnet;
pub mod node;
pub mod rpc;
pub mod shutdown;
pub mod snapshot;
