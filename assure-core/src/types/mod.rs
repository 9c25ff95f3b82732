//! Core protocol data types.
//!
//! - [`Pool`] and [`PoolState`]: one assurance engagement and its lifecycle
//! - [`PoolParams`]: the arguments of `createPool`
//! - [`Stake`]: one staker's position in one pool
//! - Primitive aliases for addresses, pool ids, and ticks

mod pool;
mod stake;

pub use pool::{Pool, PoolParams, PoolState};
pub use stake::Stake;

use crate::error::CoreError;

/// 20-byte account or contract address.
pub type Address = [u8; 20];

/// Sequential pool index, starting at 0.
pub type PoolId = u64;

/// Block-equivalent time unit used for every duration in the protocol.
pub type Tick = u64;

/// Denominator for basis-point multipliers (10_000 = 1.0x).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Hex-encode an address (no `0x` prefix).
pub fn address_to_hex(address: &Address) -> String {
    hex::encode(address)
}

/// Parse an address from hex, with or without a `0x` prefix.
pub fn address_from_hex(text: &str) -> Result<Address, CoreError> {
    let text = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(text).map_err(|e| CoreError::InvalidAddress(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CoreError::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len())))
}
