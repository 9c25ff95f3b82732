//! Error types for protocol operations.

use assure_core::{Address, OperationKind, PoolId, PoolState, U256};

/// Coarse error classes surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown pool or stake.
    NotFound,
    /// Wrong caller role.
    Unauthorized,
    /// Operation not permitted in the pool's current state.
    IllegalTransition,
    /// Deposit, allowance, or balance too low.
    InsufficientFunds,
    /// Stake would exceed the pool's cap.
    CapacityExceeded,
    /// A ledger or oracle call errored.
    ExternalCallFailed,
    /// Pool name already taken.
    DuplicateName,
    /// Malformed argument, envelope, or parameter set.
    InvalidArgument,
    /// Amount arithmetic overflowed.
    ArithmeticOverflow,
}

impl ErrorKind {
    /// Stable name used in RPC error payloads.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::IllegalTransition => "illegal_transition",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::CapacityExceeded => "capacity_exceeded",
            ErrorKind::ExternalCallFailed => "external_call_failed",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::ArithmeticOverflow => "arithmetic_overflow",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All validation and execution errors for protocol operations.
///
/// Any error aborts the whole call: no pool mutation and no transfer is
/// applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    // === Lookup Errors ===
    /// Pool id out of range.
    PoolNotFound { pool_id: PoolId },
    /// Caller has no stake in the pool.
    StakeNotFound { pool_id: PoolId, staker: Address },

    // === Role Errors ===
    /// Owner-only operation called by someone else.
    NotPoolOwner {
        pool_id: PoolId,
        owner: Address,
        caller: Address,
    },
    /// The owner may not stake into their own pool.
    OwnerCannotStake { pool_id: PoolId },

    // === State Errors ===
    /// Operation not permitted in the observed state.
    IllegalTransition {
        pool_id: PoolId,
        state: PoolState,
        operation: OperationKind,
    },
    /// `checkPolicy` called while the policy holds.
    PolicyNotViolated { pool_id: PoolId },
    /// Deposit already withdrawn from a cancelled pool.
    DepositDrained { pool_id: PoolId },

    // === Funds Errors ===
    /// Ledger allowance below the amount to pull.
    InsufficientAllowance {
        owner: Address,
        available: U256,
        required: U256,
    },
    /// Ledger balance below the amount to move.
    InsufficientBalance {
        owner: Address,
        available: U256,
        required: U256,
    },
    /// Stake would push the pool past its cap.
    StakeCapExceeded {
        pool_id: PoolId,
        cap: U256,
        requested: U256,
    },

    // === External Call Errors ===
    /// Ledger call failed.
    LedgerCallFailed(String),
    /// Expert oracle call failed.
    ExpertOracleFailed(String),
    /// Policy oracle call failed.
    PolicyOracleFailed(String),

    // === Argument Errors ===
    /// Pool name already used.
    DuplicatePoolName { name: String },
    /// Amount must be greater than zero.
    ZeroAmount,
    /// Pool parameters rejected.
    InvalidPoolParams { reason: String },
    /// Envelope signature verification failed.
    InvalidSignature,
    /// Envelope nonce does not match the signer's next nonce.
    InvalidNonce { expected: u64, actual: u64 },

    // === General Errors ===
    /// Arithmetic overflow in calculation.
    ArithmeticOverflow,
}

impl StateError {
    /// Map to the coarse error class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StateError::PoolNotFound { .. } | StateError::StakeNotFound { .. } => {
                ErrorKind::NotFound
            }
            StateError::NotPoolOwner { .. } | StateError::OwnerCannotStake { .. } => {
                ErrorKind::Unauthorized
            }
            StateError::IllegalTransition { .. }
            | StateError::PolicyNotViolated { .. }
            | StateError::DepositDrained { .. } => ErrorKind::IllegalTransition,
            StateError::InsufficientAllowance { .. } | StateError::InsufficientBalance { .. } => {
                ErrorKind::InsufficientFunds
            }
            StateError::StakeCapExceeded { .. } => ErrorKind::CapacityExceeded,
            StateError::LedgerCallFailed(_)
            | StateError::ExpertOracleFailed(_)
            | StateError::PolicyOracleFailed(_) => ErrorKind::ExternalCallFailed,
            StateError::DuplicatePoolName { .. } => ErrorKind::DuplicateName,
            StateError::ZeroAmount
            | StateError::InvalidPoolParams { .. }
            | StateError::InvalidSignature
            | StateError::InvalidNonce { .. } => ErrorKind::InvalidArgument,
            StateError::ArithmeticOverflow => ErrorKind::ArithmeticOverflow,
        }
    }
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::PoolNotFound { pool_id } => write!(f, "pool not found: {}", pool_id),
            StateError::StakeNotFound { pool_id, staker } => {
                write!(f, "no stake in pool {} for {:?}", pool_id, &staker[..4])
            }
            StateError::NotPoolOwner {
                pool_id,
                owner,
                caller,
            } => write!(
                f,
                "pool {} is owned by {:?}, not {:?}",
                pool_id,
                &owner[..4],
                &caller[..4]
            ),
            StateError::OwnerCannotStake { pool_id } => {
                write!(f, "owner cannot stake into own pool {}", pool_id)
            }
            StateError::IllegalTransition {
                pool_id,
                state,
                operation,
            } => write!(f, "{} not permitted on pool {} in state {}", operation, pool_id, state),
            StateError::PolicyNotViolated { pool_id } => {
                write!(f, "policy of pool {} is not violated", pool_id)
            }
            StateError::DepositDrained { pool_id } => {
                write!(f, "deposit of pool {} already withdrawn", pool_id)
            }
            StateError::InsufficientAllowance {
                owner,
                available,
                required,
            } => write!(
                f,
                "insufficient allowance for {:?}: available {}, required {}",
                &owner[..4],
                available,
                required
            ),
            StateError::InsufficientBalance {
                owner,
                available,
                required,
            } => write!(
                f,
                "insufficient balance for {:?}: available {}, required {}",
                &owner[..4],
                available,
                required
            ),
            StateError::StakeCapExceeded {
                pool_id,
                cap,
                requested,
            } => write!(
                f,
                "stake cap of pool {} exceeded: cap {}, requested total {}",
                pool_id, cap, requested
            ),
            StateError::LedgerCallFailed(msg) => write!(f, "ledger call failed: {}", msg),
            StateError::ExpertOracleFailed(msg) => write!(f, "expert oracle failed: {}", msg),
            StateError::PolicyOracleFailed(msg) => write!(f, "policy oracle failed: {}", msg),
            StateError::DuplicatePoolName { name } => write!(f, "pool name already used: {}", name),
            StateError::ZeroAmount => write!(f, "amount is zero"),
            StateError::InvalidPoolParams { reason } => write!(f, "invalid pool parameters: {}", reason),
            StateError::InvalidSignature => write!(f, "invalid signature"),
            StateError::InvalidNonce { expected, actual } => {
                write!(f, "invalid nonce: expected {}, got {}", expected, actual)
            }
            StateError::ArithmeticOverflow => write!(f, "arithmetic overflow"),
        }
    }
}

impl std::error::Error for StateError {}

/// Result type for protocol operations.
pub type StateResult<T> = Result<T, StateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StateError::IllegalTransition {
            pool_id: 2,
            state: PoolState::ViolatedFunded,
            operation: OperationKind::StakeFunds,
        };
        assert_eq!(
            err.to_string(),
            "stake_funds not permitted on pool 2 in state violated_funded"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(StateError::PoolNotFound { pool_id: 0 }.kind(), ErrorKind::NotFound);
        assert_eq!(
            StateError::OwnerCannotStake { pool_id: 0 }.kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            StateError::PolicyNotViolated { pool_id: 0 }.kind(),
            ErrorKind::IllegalTransition
        );
        assert_eq!(
            StateError::PolicyOracleFailed("timeout".into()).kind(),
            ErrorKind::ExternalCallFailed
        );
        assert_eq!(
            StateError::DuplicatePoolName { name: "a".into() }.kind(),
            ErrorKind::DuplicateName
        );
        assert_eq!(StateError::ZeroAmount.kind().name(), "invalid_argument");
    }
}
