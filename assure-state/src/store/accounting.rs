//! Pool accounting.
//!
//! Every mutation of stakes or deposit goes through these helpers so that
//! `sum(amount) == total_staked` and `sum(weighted_amount) ==
//! pool_weighted_size` hold after each one.

use assure_core::{Address, PoolId, PoolState, Stake, Tick, U256};

use crate::error::{StateError, StateResult};
use crate::store::PoolWriter;

/// Move a pool to `state`, stamping the transition time.
pub(crate) fn set_state<S: PoolWriter>(store: &mut S, pool_id: PoolId, state: PoolState, now: Tick) {
    store.update_pool(pool_id, |pool| {
        if pool.state != state {
            tracing::info!(pool_id, from = %pool.state, to = %state, "pool state changed");
            pool.state = state;
            pool.time_of_last_state_change = now;
        }
    });
}

/// Add to the owner deposit.
pub(crate) fn credit_deposit<S: PoolWriter>(
    store: &mut S,
    pool_id: PoolId,
    amount: U256,
) -> StateResult<()> {
    let pool = store
        .get_pool(pool_id)
        .ok_or(StateError::PoolNotFound { pool_id })?;
    let deposit = pool
        .deposit
        .checked_add(amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    store.update_pool(pool_id, |pool| pool.deposit = deposit);
    Ok(())
}

/// Take from the owner deposit. Fails rather than going negative.
pub(crate) fn debit_deposit<S: PoolWriter>(
    store: &mut S,
    pool_id: PoolId,
    amount: U256,
) -> StateResult<()> {
    let pool = store
        .get_pool(pool_id)
        .ok_or(StateError::PoolNotFound { pool_id })?;
    let deposit = pool
        .deposit
        .checked_sub(amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    store.update_pool(pool_id, |pool| pool.deposit = deposit);
    Ok(())
}

/// Add `amount` to a staker's position, opening one if needed.
///
/// `weight_bps` is only used when the position is new; an existing
/// position keeps the multiplier frozen at its first stake. Returns the
/// weighted amount added.
pub(crate) fn add_stake<S: PoolWriter>(
    store: &mut S,
    pool_id: PoolId,
    staker: Address,
    amount: U256,
    weight_bps: u32,
    now: Tick,
) -> StateResult<U256> {
    let pool = store
        .get_pool(pool_id)
        .ok_or(StateError::PoolNotFound { pool_id })?;
    let (mut stake, is_new) = match store.get_stake(pool_id, &staker) {
        Some(existing) => (existing.clone(), false),
        None => (Stake::open(weight_bps, now), true),
    };

    let weighted = amount
        .checked_mul_bps(stake.weight_bps)
        .ok_or(StateError::ArithmeticOverflow)?;

    let total_staked = pool
        .total_staked
        .checked_add(amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    let pool_weighted_size = pool
        .pool_weighted_size
        .checked_add(weighted)
        .ok_or(StateError::ArithmeticOverflow)?;

    stake.amount = stake
        .amount
        .checked_add(amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    stake.weighted_amount = stake
        .weighted_amount
        .checked_add(weighted)
        .ok_or(StateError::ArithmeticOverflow)?;

    store.put_stake(pool_id, staker, stake);
    store.update_pool(pool_id, |pool| {
        pool.total_staked = total_staked;
        pool.pool_weighted_size = pool_weighted_size;
        if is_new {
            pool.stake_count += 1;
        }
    });

    Ok(weighted)
}

/// Close a staker's position and return it.
pub(crate) fn remove_stake<S: PoolWriter>(
    store: &mut S,
    pool_id: PoolId,
    staker: &Address,
) -> StateResult<Stake> {
    let stake = store
        .take_stake(pool_id, staker)
        .ok_or(StateError::StakeNotFound {
            pool_id,
            staker: *staker,
        })?;

    let pool = store
        .get_pool(pool_id)
        .ok_or(StateError::PoolNotFound { pool_id })?;
    let total_staked = pool
        .total_staked
        .checked_sub(stake.amount)
        .ok_or(StateError::ArithmeticOverflow)?;
    let pool_weighted_size = pool
        .pool_weighted_size
        .checked_sub(stake.weighted_amount)
        .ok_or(StateError::ArithmeticOverflow)?;

    store.update_pool(pool_id, |pool| {
        pool.total_staked = total_staked;
        pool.pool_weighted_size = pool_weighted_size;
        pool.stake_count = pool.stake_count.saturating_sub(1);
    });

    Ok(stake)
}

/// Close every position in a pool. Returns the raw amount released.
pub(crate) fn drain_stakes<S: PoolWriter>(store: &mut S, pool_id: PoolId) -> StateResult<U256> {
    let stakers: Vec<Address> = store
        .stakes_of(pool_id)
        .into_iter()
        .map(|(staker, _)| staker)
        .collect();

    let mut released = U256::zero();
    for staker in stakers {
        let stake = remove_stake(store, pool_id, &staker)?;
        released = released
            .checked_add(stake.amount)
            .ok_or(StateError::ArithmeticOverflow)?;
    }
    Ok(released)
}
