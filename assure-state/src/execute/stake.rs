//! Staker handlers.
//!
//! Handles StakeFunds, WithdrawStake, and WithdrawInterest. The caller is
//! always the staker.

use assure_core::{Address, OperationKind, Pool, PoolId, PoolState, BPS_DENOMINATOR, U256};

use crate::error::{StateError, StateResult};
use crate::payout::owed_interest;
use crate::store::{add_stake, debit_deposit, remove_stake, set_state, PoolWriter};

use super::context::ExecutionContext;
use super::journal::TransferJournal;
use super::observe::{admit, check_pull, load_pool, observe, settle};

/// Execute a StakeFunds operation.
///
/// # Validation
/// - Pool must exist and the caller must not be its owner
/// - Amount must be > 0
/// - Pool must accept stakes after the trigger evaluation
/// - `total_staked + amount <= max_total_stake`
/// - Caller's allowance and balance must cover the amount
pub fn execute_stake_funds<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
    amount: U256,
) -> StateResult<()> {
    let pool = load_pool(store, pool_id)?;
    if pool.owner == *caller {
        return Err(StateError::OwnerCannotStake { pool_id });
    }
    if amount.is_zero() {
        return Err(StateError::ZeroAmount);
    }

    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::StakeFunds, pool_id, &obs)? {
        return Ok(());
    }

    let pool = load_pool(store, pool_id)?;
    let requested = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    if requested > pool.max_total_stake {
        return Err(StateError::StakeCapExceeded {
            pool_id,
            cap: pool.max_total_stake,
            requested,
        });
    }
    check_pull(ctx, caller, amount)?;

    // Expert status is only read on the first stake; later stakes reuse
    // the frozen multiplier.
    let weight_bps = match store.get_stake(pool_id, caller) {
        Some(existing) => existing.weight_bps,
        None => first_stake_weight(store, ctx, &pool, caller)?,
    };

    let weighted = add_stake(store, pool_id, *caller, amount, weight_bps, ctx.now)?;
    journal.pull(*caller, ctx.escrow, amount)?;
    let state = settle(store, ctx, pool_id, obs.violated)?;

    tracing::debug!(
        pool_id,
        staker = %assure_core::address_to_hex(caller),
        %amount,
        %weighted,
        weight_bps,
        %state,
        "stake added"
    );
    Ok(())
}

/// Multiplier for a new position. Claims the first-expert slot if open.
fn first_stake_weight<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    pool: &Pool,
    staker: &Address,
) -> StateResult<u32> {
    let is_expert = ctx
        .experts
        .is_expert(staker)
        .map_err(|e| StateError::ExpertOracleFailed(e.0))?;
    if !is_expert {
        return Ok(BPS_DENOMINATOR);
    }

    let weight = BPS_DENOMINATOR
        .checked_add(pool.bonus_expert_factor)
        .ok_or(StateError::ArithmeticOverflow)?;
    if pool.first_expert_staker.is_some() {
        return Ok(weight);
    }

    let first_bonus = u64::from(BPS_DENOMINATOR) + u64::from(pool.bonus_first_expert_factor);
    let boosted = u64::from(weight) * first_bonus / u64::from(BPS_DENOMINATOR);
    let boosted = u32::try_from(boosted).map_err(|_| StateError::ArithmeticOverflow)?;

    let staker = *staker;
    store.update_pool(pool.pool_id, |p| p.first_expert_staker = Some(staker));
    Ok(boosted)
}

/// Execute a WithdrawStake operation.
///
/// Returns principal, plus accrued interest in the not-violated
/// underfunded and expired states. Violated and cancelled pools refund
/// principal only; a caller with nothing staked in a cancelled pool gets a
/// no-op. An underfunded pool whose remaining stake falls below the minimum
/// is cancelled.
pub fn execute_withdraw_stake<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
) -> StateResult<()> {
    load_pool(store, pool_id)?;
    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::WithdrawStake, pool_id, &obs)? {
        return Ok(());
    }

    if obs.after == PoolState::Cancelled && store.get_stake(pool_id, caller).is_none() {
        return Ok(());
    }

    let pool = load_pool(store, pool_id)?;
    let owed = match obs.after {
        PoolState::NotViolatedUnderfunded | PoolState::PolicyExpired => {
            let stakes = store.stakes_of(pool_id);
            if !stakes.iter().any(|(addr, _)| addr == caller) {
                return Err(StateError::StakeNotFound {
                    pool_id,
                    staker: *caller,
                });
            }
            owed_interest(&pool, &stakes, caller, ctx.now)?
        }
        _ => U256::zero(),
    };

    let stake = remove_stake(store, pool_id, caller)?;
    let (interest, drained) = take_interest(store, &pool, owed)?;
    let total = stake
        .amount
        .checked_add(interest)
        .ok_or(StateError::ArithmeticOverflow)?;
    journal.payout(ctx.escrow, *caller, total)?;

    // An underfunded pool left short of its minimum stake cannot recover.
    let abandoned = obs.after == PoolState::NotViolatedUnderfunded
        && store
            .get_pool(pool_id)
            .map(|p| !p.is_staked_enough())
            .unwrap_or(false);
    if drained || abandoned {
        set_state(store, pool_id, PoolState::Cancelled, ctx.now);
    }
    let state = settle(store, ctx, pool_id, obs.violated)?;

    tracing::debug!(
        pool_id,
        staker = %assure_core::address_to_hex(caller),
        principal = %stake.amount,
        %interest,
        %state,
        "stake withdrawn"
    );
    Ok(())
}

/// Execute a WithdrawInterest operation.
///
/// Pays whole elapsed periods and resets the staker's payout tick. When
/// the owed amount reaches the remaining deposit, the deposit is paid out
/// in full and the pool is cancelled.
pub fn execute_withdraw_interest<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    pool_id: PoolId,
) -> StateResult<()> {
    load_pool(store, pool_id)?;
    let obs = observe(store, ctx, pool_id)?;
    if !admit(OperationKind::WithdrawInterest, pool_id, &obs)? {
        return Ok(());
    }

    let pool = load_pool(store, pool_id)?;
    let (owed, mut stake) = {
        let stakes = store.stakes_of(pool_id);
        let stake = stakes
            .iter()
            .find(|(addr, _)| addr == caller)
            .map(|(_, stake)| (*stake).clone())
            .ok_or(StateError::StakeNotFound {
                pool_id,
                staker: *caller,
            })?;
        (owed_interest(&pool, &stakes, caller, ctx.now)?, stake)
    };

    if owed.is_zero() {
        return Ok(());
    }

    let (paid, drained) = take_interest(store, &pool, owed)?;
    stake.last_payout_tick = ctx.now;
    store.put_stake(pool_id, *caller, stake);
    journal.payout(ctx.escrow, *caller, paid)?;

    if drained {
        tracing::warn!(pool_id, %owed, %paid, "interest drained deposit");
        set_state(store, pool_id, PoolState::Cancelled, ctx.now);
    }
    let state = settle(store, ctx, pool_id, obs.violated)?;

    tracing::debug!(
        pool_id,
        staker = %assure_core::address_to_hex(caller),
        %paid,
        %state,
        "interest paid"
    );
    Ok(())
}

/// Debit owed interest from the deposit, capped at what is left.
///
/// Returns the amount paid and whether the payout exhausted the deposit.
fn take_interest<S: PoolWriter>(store: &mut S, pool: &Pool, owed: U256) -> StateResult<(U256, bool)> {
    if owed.is_zero() {
        return Ok((U256::zero(), false));
    }
    let deposit = store
        .get_pool(pool.pool_id)
        .map(|p| p.deposit)
        .ok_or(StateError::PoolNotFound {
            pool_id: pool.pool_id,
        })?;
    let paid = owed.min(deposit);
    debit_deposit(store, pool.pool_id, paid)?;
    Ok((paid, owed >= deposit))
}
