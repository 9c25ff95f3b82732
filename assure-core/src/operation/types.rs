//! Operation payloads.

use serde::{Deserialize, Serialize};

use crate::types::{PoolId, PoolParams};
use crate::u256::U256;

/// The eight mutating protocol calls.
///
/// The caller is not part of the payload: it is the signer of the
/// envelope, or the address the embedding application authenticated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new pool owned by the caller.
    CreatePool(PoolParams),

    /// Stake `amount` into a pool.
    StakeFunds {
        /// Target pool.
        pool_id: PoolId,
        /// Amount pulled from the caller.
        amount: U256,
    },

    /// Withdraw the caller's whole stake.
    WithdrawStake {
        /// Target pool.
        pool_id: PoolId,
    },

    /// Owner tops up the deposit.
    DepositFunds {
        /// Target pool.
        pool_id: PoolId,
        /// Amount pulled from the owner.
        amount: U256,
    },

    /// Owner withdraws the deposit.
    WithdrawDeposit {
        /// Target pool.
        pool_id: PoolId,
    },

    /// Staker collects accrued interest.
    WithdrawInterest {
        /// Target pool.
        pool_id: PoolId,
    },

    /// Owner claims deposit and stakes after a violation.
    WithdrawClaim {
        /// Target pool.
        pool_id: PoolId,
    },

    /// Force a policy evaluation.
    CheckPolicy {
        /// Target pool.
        pool_id: PoolId,
    },
}

/// Discriminant of [`Operation`], used in errors, receipts and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// `createPool`
    CreatePool,
    /// `stakeFunds`
    StakeFunds,
    /// `withdrawStake`
    WithdrawStake,
    /// `depositFunds`
    DepositFunds,
    /// `withdrawDeposit`
    WithdrawDeposit,
    /// `withdrawInterest`
    WithdrawInterest,
    /// `withdrawClaim`
    WithdrawClaim,
    /// `checkPolicy`
    CheckPolicy,
}

impl OperationKind {
    /// Method name as exposed to callers.
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::CreatePool => "create_pool",
            OperationKind::StakeFunds => "stake_funds",
            OperationKind::WithdrawStake => "withdraw_stake",
            OperationKind::DepositFunds => "deposit_funds",
            OperationKind::WithdrawDeposit => "withdraw_deposit",
            OperationKind::WithdrawInterest => "withdraw_interest",
            OperationKind::WithdrawClaim => "withdraw_claim",
            OperationKind::CheckPolicy => "check_policy",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Operation {
    /// The operation's discriminant.
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::CreatePool(_) => OperationKind::CreatePool,
            Operation::StakeFunds { .. } => OperationKind::StakeFunds,
            Operation::WithdrawStake { .. } => OperationKind::WithdrawStake,
            Operation::DepositFunds { .. } => OperationKind::DepositFunds,
            Operation::WithdrawDeposit { .. } => OperationKind::WithdrawDeposit,
            Operation::WithdrawInterest { .. } => OperationKind::WithdrawInterest,
            Operation::WithdrawClaim { .. } => OperationKind::WithdrawClaim,
            Operation::CheckPolicy { .. } => OperationKind::CheckPolicy,
        }
    }

    /// Target pool, or `None` for `CreatePool`.
    pub fn pool_id(&self) -> Option<PoolId> {
        match self {
            Operation::CreatePool(_) => None,
            Operation::StakeFunds { pool_id, .. }
            | Operation::WithdrawStake { pool_id }
            | Operation::DepositFunds { pool_id, .. }
            | Operation::WithdrawDeposit { pool_id }
            | Operation::WithdrawInterest { pool_id }
            | Operation::WithdrawClaim { pool_id }
            | Operation::CheckPolicy { pool_id } => Some(*pool_id),
        }
    }
}
