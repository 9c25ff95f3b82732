//! Deterministic binary serialization for the Assure protocol.
//!
//! Signed operations and store snapshots are encoded with bincode using a
//! fixed configuration, so the bytes an account signs are the bytes the
//! node verifies.

mod bincode_config;

pub use bincode_config::{deserialize, serialize};
