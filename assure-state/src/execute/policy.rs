//! Policy check handler.

use assure_core::{Address, OperationKind, PoolId, PoolState};

use crate::error::{StateError, StateResult};
use crate::machine::{authorize, Verdict};
use crate::store::PoolWriter;

use super::context::ExecutionContext;
use super::observe::{load_pool, observe};

/// Execute a CheckPolicy operation.
///
/// Anyone may call it. It only persists the transition the triggers call
/// for; no funds move. Fails loudly with `PolicyNotViolated` when an active
/// pool's policy still holds, even if the pool timed out or expired.
pub fn execute_check_policy<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    caller: &Address,
    pool_id: PoolId,
) -> StateResult<()> {
    load_pool(store, pool_id)?;
    let obs = observe(store, ctx, pool_id)?;

    match authorize(OperationKind::CheckPolicy, obs.before, obs.after, obs.violated) {
        Verdict::Reject => match obs.before {
            PoolState::Initialized | PoolState::NotViolatedFunded | PoolState::NotViolatedUnderfunded
                if !obs.violated =>
            {
                Err(StateError::PolicyNotViolated { pool_id })
            }
            _ => Err(StateError::IllegalTransition {
                pool_id,
                state: obs.after,
                operation: OperationKind::CheckPolicy,
            }),
        },
        Verdict::Proceed | Verdict::TransitionOnly => {
            tracing::debug!(
                pool_id,
                caller = %assure_core::address_to_hex(caller),
                from = %obs.before,
                to = %obs.after,
                "policy checked"
            );
            Ok(())
        }
    }
}
