//! Payout computation.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use assure_core::{Address, Pool, Stake, Tick, U256};

use crate::error::{StateError, StateResult};

/// Single-period payout for every staker in the pool.
///
/// Each staker first gets `floor(weighted * M / W)`. The units lost to
/// flooring (always fewer than the number of stakers) go one each to the
/// stakers with the largest remainders; ties go to the earlier stake, then
/// the lower address. An empty pool yields an empty map.
pub fn period_shares(
    pool: &Pool,
    stakes: &[(Address, &Stake)],
) -> StateResult<BTreeMap<Address, U256>> {
    let mut shares = BTreeMap::new();
    let total_weight = pool.pool_weighted_size;
    if total_weight.is_zero() {
        return Ok(shares);
    }

    let payout = pool.max_payout_per_period;
    let mut ranked: Vec<(U256, Tick, Address)> = Vec::with_capacity(stakes.len());
    let mut distributed = U256::zero();

    for (staker, stake) in stakes {
        let scaled = stake
            .weighted_amount
            .checked_mul(payout)
            .ok_or(StateError::ArithmeticOverflow)?;
        let base = scaled / total_weight;
        let remainder = scaled % total_weight;
        distributed = distributed
            .checked_add(base)
            .ok_or(StateError::ArithmeticOverflow)?;
        shares.insert(*staker, base);
        ranked.push((remainder, stake.block_staked, *staker));
    }

    let leftover = payout.saturating_sub(distributed);
    if leftover.is_zero() {
        return Ok(shares);
    }

    ranked.sort_by(|a, b| match b.0.cmp(&a.0) {
        Ordering::Equal => (a.1, a.2).cmp(&(b.1, b.2)),
        other => other,
    });

    let bonus_slots = leftover.to_u64().unwrap_or(u64::MAX);
    for (_, _, staker) in ranked.iter().take(usize::try_from(bonus_slots).unwrap_or(usize::MAX)) {
        if let Some(share) = shares.get_mut(staker) {
            *share = *share + U256::one();
        }
    }

    Ok(shares)
}

/// One staker's single-period payout. Zero when the staker has no stake.
pub fn period_payout(pool: &Pool, stakes: &[(Address, &Stake)], staker: &Address) -> StateResult<U256> {
    Ok(period_shares(pool, stakes)?
        .get(staker)
        .copied()
        .unwrap_or_default())
}

/// Interest owed to `staker` at `now`: whole elapsed periods times the
/// staker's per-period share. Not capped by the deposit.
pub fn owed_interest(
    pool: &Pool,
    stakes: &[(Address, &Stake)],
    staker: &Address,
    now: Tick,
) -> StateResult<U256> {
    let stake = match stakes.iter().find(|(addr, _)| addr == staker) {
        Some((_, stake)) => *stake,
        None => return Ok(U256::zero()),
    };

    let periods = stake.elapsed_periods(now, pool.pay_period_length);
    if periods == 0 || pool.pool_weighted_size.is_zero() {
        return Ok(U256::zero());
    }

    let per_period = period_payout(pool, stakes, staker)?;
    per_period
        .checked_mul(U256::from(periods))
        .ok_or(StateError::ArithmeticOverflow)
}
