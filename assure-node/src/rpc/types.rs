//! RPC response types.
//!
//! Addresses are hex without prefix, amounts 0x-prefixed hex.

use serde::{Deserialize, Serialize};

use assure_core::{address_to_hex, Pool, Stake};
use assure_state::{OperationReceipt, Transfer, TransferKind};

use super::format_u256;

/// Pool information returned by RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInfo {
    pub pool_id: u64,
    pub name: String,
    pub owner: String,
    pub candidate_contract: String,
    pub policy: String,
    pub state: String,
    pub max_payout_per_period: String,
    pub min_stake: String,
    pub deposit: String,
    pub bonus_expert_factor: u32,
    pub bonus_first_expert_factor: u32,
    pub first_expert_staker: Option<String>,
    pub pay_period_length: u64,
    pub min_stake_duration: u64,
    pub timeout_duration: u64,
    pub time_of_last_state_change: u64,
    pub url_of_report: String,
    pub total_staked: String,
    pub pool_weighted_size: String,
    pub stake_count: u64,
    pub max_total_stake: String,
}

impl From<&Pool> for PoolInfo {
    fn from(p: &Pool) -> Self {
        Self {
            pool_id: p.pool_id,
            name: p.name.clone(),
            owner: address_to_hex(&p.owner),
            candidate_contract: address_to_hex(&p.candidate_contract),
            policy: address_to_hex(&p.policy),
            state: p.state.name().to_string(),
            max_payout_per_period: format_u256(&p.max_payout_per_period),
            min_stake: format_u256(&p.min_stake),
            deposit: format_u256(&p.deposit),
            bonus_expert_factor: p.bonus_expert_factor,
            bonus_first_expert_factor: p.bonus_first_expert_factor,
            first_expert_staker: p.first_expert_staker.as_ref().map(address_to_hex),
            pay_period_length: p.pay_period_length,
            min_stake_duration: p.min_stake_duration,
            timeout_duration: p.timeout_duration,
            time_of_last_state_change: p.time_of_last_state_change,
            url_of_report: p.url_of_report.clone(),
            total_staked: format_u256(&p.total_staked),
            pool_weighted_size: format_u256(&p.pool_weighted_size),
            stake_count: p.stake_count,
            max_total_stake: format_u256(&p.max_total_stake),
        }
    }
}

/// Stake information returned by RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeInfo {
    pub amount: String,
    pub weighted_amount: String,
    pub weight_bps: u32,
    pub block_staked: u64,
    pub last_payout_tick: u64,
}

impl From<&Stake> for StakeInfo {
    fn from(s: &Stake) -> Self {
        Self {
            amount: format_u256(&s.amount),
            weighted_amount: format_u256(&s.weighted_amount),
            weight_bps: s.weight_bps,
            block_staked: s.block_staked,
            last_payout_tick: s.last_payout_tick,
        }
    }
}

/// One ledger movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferInfo {
    pub kind: String,
    pub from: String,
    pub to: String,
    pub amount: String,
}

impl From<&Transfer> for TransferInfo {
    fn from(t: &Transfer) -> Self {
        let kind = match t.kind {
            TransferKind::Pull => "pull",
            TransferKind::Payout => "payout",
        };
        Self {
            kind: kind.to_string(),
            from: address_to_hex(&t.from),
            to: address_to_hex(&t.to),
            amount: format_u256(&t.amount),
        }
    }
}

/// Result of a mutating call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptInfo {
    pub operation: String,
    pub pool_id: u64,
    pub previous_state: String,
    pub state: String,
    pub transfers: Vec<TransferInfo>,
}

impl From<&OperationReceipt> for ReceiptInfo {
    fn from(r: &OperationReceipt) -> Self {
        Self {
            operation: r.operation.name().to_string(),
            pool_id: r.pool_id,
            previous_state: r.previous_state.name().to_string(),
            state: r.state.name().to_string(),
            transfers: r.transfers.iter().map(TransferInfo::from).collect(),
        }
    }
}
