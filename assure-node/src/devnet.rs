//! Devnet mode configuration.
//!
//! Devnet mode enables local development and testing by:
//! - Driving the protocol from a manual tick counter
//! - Exposing a token faucet and allowance shortcut
//! - Letting callers flip policy violations and expert status

use assure_core::{Tick, U256};

/// Devnet configuration.
#[derive(Debug, Clone)]
pub struct DevnetConfig {
    /// Tick the manual clock starts at.
    pub start_tick: Tick,

    /// Amount `devnet_mint` hands out when no amount is given.
    pub faucet_amount: U256,
}

impl DevnetConfig {
    /// Default faucet drip.
    pub const DEFAULT_FAUCET_AMOUNT: u64 = 1_000_000;

    /// Create a new devnet configuration.
    pub fn new() -> Self {
        Self {
            start_tick: 0,
            faucet_amount: U256::from(Self::DEFAULT_FAUCET_AMOUNT),
        }
    }
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self::new()
    }
}
