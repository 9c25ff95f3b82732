//! Operation executor - main entry point for pool state transitions.
//!
//! [`apply_operation`] runs one operation against a store and stages its
//! transfers. It does not touch the ledger: the caller runs it on a staged
//! copy of the store and commits both only if everything succeeded.

use serde::{Deserialize, Serialize};

use assure_core::{Address, Operation, OperationKind, PoolId, PoolState, SignedOperation};

use crate::error::{StateError, StateResult};
use crate::store::{PoolReader, PoolWriter};

use super::context::ExecutionContext;
use super::deposit::{execute_deposit_funds, execute_withdraw_claim, execute_withdraw_deposit};
use super::journal::{Transfer, TransferJournal};
use super::policy::execute_check_policy;
use super::pool::execute_create_pool;
use super::stake::{execute_stake_funds, execute_withdraw_interest, execute_withdraw_stake};

/// Result of a successful mutating call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// Operation that ran.
    pub operation: OperationKind,
    /// Pool it ran against (the new id for `create_pool`).
    pub pool_id: PoolId,
    /// State before the call. `None` for `create_pool`.
    pub previous_state: PoolState,
    /// State after the call.
    pub state: PoolState,
    /// Ledger movements the call performs.
    pub transfers: Vec<Transfer>,
}

/// Apply an operation on behalf of `caller`.
///
/// # Returns
/// - `Ok((receipt, journal))` with the transfers still to be committed
/// - `Err(StateError)` if validation or execution failed; the store may
///   be partially written and must be discarded
pub fn apply_operation<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    caller: &Address,
    op: &Operation,
) -> StateResult<(OperationReceipt, TransferJournal)> {
    let mut journal = TransferJournal::new();

    let (pool_id, previous_state) = match op {
        Operation::CreatePool(params) => {
            let pool_id = execute_create_pool(store, ctx, &mut journal, caller, params)?;
            (pool_id, PoolState::None)
        }

        Operation::StakeFunds { pool_id, amount } => {
            let before = state_of(&*store, *pool_id);
            execute_stake_funds(store, ctx, &mut journal, caller, *pool_id, *amount)?;
            (*pool_id, before)
        }

        Operation::WithdrawStake { pool_id } => {
            let before = state_of(&*store, *pool_id);
            execute_withdraw_stake(store, ctx, &mut journal, caller, *pool_id)?;
            (*pool_id, before)
        }

        Operation::DepositFunds { pool_id, amount } => {
            let before = state_of(&*store, *pool_id);
            execute_deposit_funds(store, ctx, &mut journal, caller, *pool_id, *amount)?;
            (*pool_id, before)
        }

        Operation::WithdrawDeposit { pool_id } => {
            let before = state_of(&*store, *pool_id);
            execute_withdraw_deposit(store, ctx, &mut journal, caller, *pool_id)?;
            (*pool_id, before)
        }

        Operation::WithdrawInterest { pool_id } => {
            let before = state_of(&*store, *pool_id);
            execute_withdraw_interest(store, ctx, &mut journal, caller, *pool_id)?;
            (*pool_id, before)
        }

        Operation::WithdrawClaim { pool_id } => {
            let before = state_of(&*store, *pool_id);
            execute_withdraw_claim(store, ctx, &mut journal, caller, *pool_id)?;
            (*pool_id, before)
        }

        Operation::CheckPolicy { pool_id } => {
            let before = state_of(&*store, *pool_id);
            execute_check_policy(store, ctx, caller, *pool_id)?;
            (*pool_id, before)
        }
    };

    let receipt = OperationReceipt {
        operation: op.kind(),
        pool_id,
        previous_state,
        state: state_of(&*store, pool_id),
        transfers: journal.transfers().to_vec(),
    };
    Ok((receipt, journal))
}

fn state_of<S: PoolReader>(store: &S, pool_id: PoolId) -> PoolState {
    store
        .get_pool(pool_id)
        .map(|p| p.state)
        .unwrap_or(PoolState::None)
}

/// Apply a signed operation.
///
/// Verifies the signature, checks the envelope nonce against the signer's
/// next nonce, dispatches, and advances the nonce on success.
pub fn apply_signed_operation<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    signed: &SignedOperation,
) -> StateResult<(OperationReceipt, TransferJournal)> {
    signed
        .verify_signature()
        .map_err(|_| StateError::InvalidSignature)?;

    let caller = signed.caller();
    let expected = store.nonce(&caller);
    if signed.nonce != expected {
        return Err(StateError::InvalidNonce {
            expected,
            actual: signed.nonce,
        });
    }

    let outcome = apply_operation(store, ctx, &caller, &signed.op)?;
    store.bump_nonce(&caller);
    Ok(outcome)
}
