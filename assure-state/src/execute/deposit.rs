//! Owner handlers.
//!
//! Handles DepositFunds, WithdrawDeposit, and WithdrawClaim. All three are
//! restricted to the pool owner.

use assure_core::{Address, OperationKind, PoolId, PoolState, U256};

use crate::error::{StateError, StateResult};
use crate::store::{credit_deposit, debit_deposit, drain_stakes, set_state, PoolWriter};

use super::context::ExecutionContext;
use super::journal::TransferJournal;
use super::observe::{admit, check_pull, load_pool, observe, require_owner, settle};

/// Execute a DepositFunds operation.
///
/// # Validation
/// - Pool must exist and the caller must be its owner
/// - Amount must be > 0
/// - Caller's allowance and balance must cover the amount
pub fn execute_deposit_funds<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
    amount: U256,
) -> StateResult<()> {
    let pool = load_pool(store, pool_id)?;
    require_owner(&pool, caller)?;
    if amount.is_zero() {
        return Err(StateError::ZeroAmount);
    }

    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::DepositFunds, pool_id, &obs)? {
        return Ok(());
    }

    check_pull(ctx, caller, amount)?;
    credit_deposit(store, pool_id, amount)?;
    journal.pull(*caller, ctx.escrow, amount)?;
    let state = settle(store, ctx, pool_id, obs.violated)?;

    tracing::debug!(pool_id, %amount, %state, "deposit added");
    Ok(())
}

/// Execute a WithdrawDeposit operation.
///
/// Refunds the whole remaining deposit to the owner and cancels the pool.
/// A cancelled pool whose deposit is already gone fails with
/// `DepositDrained`.
pub fn execute_withdraw_deposit<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
) -> StateResult<()> {
    let pool = load_pool(store, pool_id)?;
    require_owner(&pool, caller)?;

    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::WithdrawDeposit, pool_id, &obs)? {
        return Ok(());
    }

    let deposit = load_pool(store, pool_id)?.deposit;
    if obs.after == PoolState::Cancelled && deposit.is_zero() {
        return Err(StateError::DepositDrained { pool_id });
    }

    debit_deposit(store, pool_id, deposit)?;
    journal.payout(ctx.escrow, *caller, deposit)?;
    set_state(store, pool_id, PoolState::Cancelled, ctx.now);

    tracing::debug!(pool_id, %deposit, "deposit withdrawn");
    Ok(())
}

/// Execute a WithdrawClaim operation.
///
/// In a violated, funded pool the owner collects the deposit and every
/// stake; the pool stays violated with nothing left in it. In an expired
/// pool the owner recovers the remaining deposit, and the pool cancels
/// once no stake is left.
pub fn execute_withdraw_claim<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
) -> StateResult<()> {
    let pool = load_pool(store, pool_id)?;
    require_owner(&pool, caller)?;

    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::WithdrawClaim, pool_id, &obs)? {
        return Ok(());
    }

    let deposit = load_pool(store, pool_id)?.deposit;
    debit_deposit(store, pool_id, deposit)?;

    let stakes = if obs.after == PoolState::ViolatedFunded {
        drain_stakes(store, pool_id)?
    } else {
        U256::zero()
    };

    let total = deposit
        .checked_add(stakes)
        .ok_or(StateError::ArithmeticOverflow)?;
    journal.payout(ctx.escrow, *caller, total)?;
    let state = settle(store, ctx, pool_id, obs.violated)?;

    tracing::debug!(pool_id, %deposit, %stakes, %state, "claim withdrawn");
    Ok(())
}
