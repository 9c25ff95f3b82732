//! Per-staker positions.

use serde::{Deserialize, Serialize};

use super::Tick;
use crate::u256::U256;

/// One staker's position in one pool.
///
/// The weight multiplier is fixed at the first stake. Later changes to the
/// staker's expert status never reach an existing position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Raw staked amount.
    pub amount: U256,

    /// `amount` scaled by `weight_bps`, accumulated per deposit.
    pub weighted_amount: U256,

    /// Weight multiplier in basis points (10_000 = 1.0x).
    pub weight_bps: u32,

    /// Tick of the first stake.
    pub block_staked: Tick,

    /// Tick of the most recent interest payout.
    pub last_payout_tick: Tick,
}

impl Stake {
    /// Open a new, empty position at `now` with a frozen multiplier.
    pub fn open(weight_bps: u32, now: Tick) -> Self {
        Self {
            amount: U256::zero(),
            weighted_amount: U256::zero(),
            weight_bps,
            block_staked: now,
            last_payout_tick: now,
        }
    }

    /// Whole pay periods elapsed since the last payout.
    #[inline]
    pub fn elapsed_periods(&self, now: Tick, pay_period_length: Tick) -> u64 {
        if pay_period_length == 0 {
            return 0;
        }
        now.saturating_sub(self.last_payout_tick) / pay_period_length
    }
}
