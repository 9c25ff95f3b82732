//! Shared pre- and post-steps for pool-scoped handlers.

use assure_core::{Address, OperationKind, Pool, PoolId, PoolState, U256};

use crate::error::{StateError, StateResult};
use crate::machine::{advance, authorize, Verdict};
use crate::store::{PoolReader, PoolWriter};

use super::journal::ledger_error;

use super::context::ExecutionContext;

/// Pool state around the trigger evaluation of one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Observation {
    pub before: PoolState,
    pub after: PoolState,
    pub violated: bool,
}

/// Fetch a pool or fail with `PoolNotFound`.
pub(crate) fn load_pool<S: PoolReader>(store: &S, pool_id: PoolId) -> StateResult<Pool> {
    store
        .get_pool(pool_id)
        .cloned()
        .ok_or(StateError::PoolNotFound { pool_id })
}

/// Fail unless `caller` owns the pool.
pub(crate) fn require_owner(pool: &Pool, caller: &Address) -> StateResult<()> {
    if pool.owner != *caller {
        return Err(StateError::NotPoolOwner {
            pool_id: pool.pool_id,
            owner: pool.owner,
            caller: *caller,
        });
    }
    Ok(())
}

/// Fail early when the escrow could not pull `amount` from `owner`.
pub(crate) fn check_pull(ctx: &ExecutionContext<'_>, owner: &Address, amount: U256) -> StateResult<()> {
    let allowance = ctx
        .ledger
        .allowance(owner, &ctx.escrow)
        .map_err(|e| ledger_error(e, owner))?;
    if allowance < amount {
        return Err(StateError::InsufficientAllowance {
            owner: *owner,
            available: allowance,
            required: amount,
        });
    }

    let balance = ctx
        .ledger
        .balance_of(owner)
        .map_err(|e| ledger_error(e, owner))?;
    if balance < amount {
        return Err(StateError::InsufficientBalance {
            owner: *owner,
            available: balance,
            required: amount,
        });
    }
    Ok(())
}

/// Evaluate the triggers and apply the resulting transitions.
///
/// The policy oracle is only consulted in states a violation can move.
pub(crate) fn observe<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    pool_id: PoolId,
) -> StateResult<Observation> {
    let mut pool = load_pool(store, pool_id)?;

    let violated = if pool.state.watches_policy() {
        ctx.policy
            .is_violated(&pool.policy, &pool.candidate_contract)
            .map_err(|e| StateError::PolicyOracleFailed(e.0))?
    } else {
        false
    };

    let before = advance(&mut pool, violated, ctx.now);
    let after = pool.state;
    if before != after {
        tracing::info!(pool_id, from = %before, to = %after, violated, "pool advanced");
        store.update_pool(pool_id, |p| *p = pool);
    }

    Ok(Observation {
        before,
        after,
        violated,
    })
}

/// Run the admission table. `Ok(true)` means run the effects, `Ok(false)`
/// means the call ends after persisting the transition.
pub(crate) fn admit(kind: OperationKind, pool_id: PoolId, obs: &Observation) -> StateResult<bool> {
    match authorize(kind, obs.before, obs.after, obs.violated) {
        Verdict::Proceed => Ok(true),
        Verdict::TransitionOnly => Ok(false),
        Verdict::Reject => Err(StateError::IllegalTransition {
            pool_id,
            state: obs.after,
            operation: kind,
        }),
    }
}

/// Re-run the triggers after an operation's own effects.
pub(crate) fn settle<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    pool_id: PoolId,
    violated: bool,
) -> StateResult<PoolState> {
    let mut pool = load_pool(store, pool_id)?;
    let before = advance(&mut pool, violated, ctx.now);
    let after = pool.state;
    if before != after {
        tracing::info!(pool_id, from = %before, to = %after, "pool settled");
        store.update_pool(pool_id, |p| *p = pool);
    }
    Ok(after)
}
