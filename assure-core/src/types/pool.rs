//! Pool types.
//!
//! A pool binds one owner's deposit to one monitored policy. Stakers join
//! the pool to earn per-period interest out of the deposit, and forfeit
//! their stake to the owner if the policy is violated while they are in.

use serde::{Deserialize, Serialize};

use super::{Address, PoolId, Tick};
use crate::u256::U256;

/// Lifecycle state of a pool.
///
/// Variant order matches the wire encoding; do not reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoolState {
    /// Sentinel for "no such pool". Never stored on an existing pool.
    None,
    /// Created; waiting for enough stake.
    Initialized,
    /// Enough stake, but the deposit cannot cover one period's payout.
    NotViolatedUnderfunded,
    /// Policy violated while underfunded.
    ViolatedUnderfunded,
    /// Enough stake and deposit; stakers are earning.
    NotViolatedFunded,
    /// Policy violated while funded; the owner may claim.
    ViolatedFunded,
    /// Terminal.
    Cancelled,
    /// The minimum staking period ran out without a violation.
    PolicyExpired,
}

impl PoolState {
    /// Human-readable name used in RPC responses and logs.
    pub fn name(&self) -> &'static str {
        match self {
            PoolState::None => "none",
            PoolState::Initialized => "initialized",
            PoolState::NotViolatedUnderfunded => "not_violated_underfunded",
            PoolState::ViolatedUnderfunded => "violated_underfunded",
            PoolState::NotViolatedFunded => "not_violated_funded",
            PoolState::ViolatedFunded => "violated_funded",
            PoolState::Cancelled => "cancelled",
            PoolState::PolicyExpired => "policy_expired",
        }
    }

    /// States in which the policy oracle is consulted.
    #[inline]
    pub fn watches_policy(&self) -> bool {
        matches!(
            self,
            PoolState::Initialized
                | PoolState::NotViolatedFunded
                | PoolState::NotViolatedUnderfunded
        )
    }

    /// Whether the pool has recorded a policy violation.
    #[inline]
    pub fn is_violated(&self) -> bool {
        matches!(self, PoolState::ViolatedFunded | PoolState::ViolatedUnderfunded)
    }
}

impl std::fmt::Display for PoolState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments to `createPool`, in caller argument order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// The monitored contract.
    pub candidate_contract: Address,
    /// The policy evaluated against the candidate contract.
    pub policy: Address,
    /// Total interest paid to all stakers per elapsed period.
    pub max_payout_per_period: U256,
    /// Minimum total stake before the pool can leave `Initialized`.
    pub min_stake: U256,
    /// Initial owner deposit, pulled from the owner at creation.
    pub deposit: U256,
    /// Extra weight for expert stakers, in basis points.
    pub bonus_expert_factor: u32,
    /// Further multiplier for the first expert to stake, in basis points.
    pub bonus_first_expert_factor: u32,
    /// Length of one pay period in ticks. Must be non-zero.
    pub pay_period_length: Tick,
    /// Ticks the pool stays active before it expires.
    pub min_stake_duration: Tick,
    /// Ticks an `Initialized` pool waits for stake before cancelling.
    pub timeout_duration: Tick,
    /// Opaque link to the audit report.
    pub report_url: String,
    /// Unique pool name.
    pub pool_name: String,
    /// Cap on the pool's total raw stake.
    pub max_total_stake: U256,
}

/// A single assurance pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Sequential pool index.
    pub pool_id: PoolId,

    /// The monitored contract.
    pub candidate_contract: Address,

    /// The policy checked against `candidate_contract`.
    pub policy: Address,

    /// The stakeholder who created the pool.
    pub owner: Address,

    /// Total interest paid to all stakers per elapsed period.
    pub max_payout_per_period: U256,

    /// Minimum total stake for the pool to be funded.
    pub min_stake: U256,

    /// Owner-funded balance backing interest and claims.
    pub deposit: U256,

    /// Expert bonus in basis points.
    pub bonus_expert_factor: u32,

    /// First-expert bonus in basis points.
    pub bonus_first_expert_factor: u32,

    /// The first expert that staked, if any.
    pub first_expert_staker: Option<Address>,

    /// Pay period length in ticks.
    pub pay_period_length: Tick,

    /// Active period length in ticks.
    pub min_stake_duration: Tick,

    /// Initialization timeout in ticks.
    pub timeout_duration: Tick,

    /// Tick of the most recent state transition.
    pub time_of_last_state_change: Tick,

    /// Opaque link to the audit report.
    pub url_of_report: String,

    /// Current lifecycle state.
    pub state: PoolState,

    /// Sum of all stakers' raw amounts.
    pub total_staked: U256,

    /// Sum of all stakers' weighted amounts.
    pub pool_weighted_size: U256,

    /// Number of stakers with a non-zero stake.
    pub stake_count: u64,

    /// Unique pool name.
    pub name: String,

    /// Cap on `total_staked`.
    pub max_total_stake: U256,
}

impl Pool {
    /// Build a freshly created pool in `Initialized`.
    pub fn new(pool_id: PoolId, owner: Address, params: PoolParams, now: Tick) -> Self {
        Self {
            pool_id,
            candidate_contract: params.candidate_contract,
            policy: params.policy,
            owner,
            max_payout_per_period: params.max_payout_per_period,
            min_stake: params.min_stake,
            deposit: params.deposit,
            bonus_expert_factor: params.bonus_expert_factor,
            bonus_first_expert_factor: params.bonus_first_expert_factor,
            first_expert_staker: None,
            pay_period_length: params.pay_period_length,
            min_stake_duration: params.min_stake_duration,
            timeout_duration: params.timeout_duration,
            time_of_last_state_change: now,
            url_of_report: params.report_url,
            state: PoolState::Initialized,
            total_staked: U256::zero(),
            pool_weighted_size: U256::zero(),
            stake_count: 0,
            name: params.pool_name,
            max_total_stake: params.max_total_stake,
        }
    }

    /// Enough stake is in the pool.
    #[inline]
    pub fn is_staked_enough(&self) -> bool {
        self.total_staked >= self.min_stake
    }

    /// Enough stake, and the deposit covers at least one period's payout.
    #[inline]
    pub fn is_funded(&self) -> bool {
        self.is_staked_enough() && self.deposit >= self.max_payout_per_period
    }

    /// Ticks since the last state change.
    #[inline]
    pub fn time_in_state(&self, now: Tick) -> Tick {
        now.saturating_sub(self.time_of_last_state_change)
    }
}
