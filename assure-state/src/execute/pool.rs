//! Pool creation handler.

use assure_core::{Address, Pool, PoolId, PoolParams};

use crate::error::{StateError, StateResult};
use crate::store::PoolWriter;

use super::context::ExecutionContext;
use super::journal::TransferJournal;
use super::observe::check_pull;

/// Execute a CreatePool operation.
///
/// The caller becomes the owner and funds the initial deposit, which is
/// pulled into escrow.
///
/// # Validation
/// - Name must be non-empty, unused, and within the length limit
/// - Report URL within the length limit
/// - `pay_period_length > 0`, `min_stake > 0`, `max_total_stake >= min_stake`
/// - Bonus factors within the basis-point ceiling
/// - Caller's allowance and balance must cover the deposit
pub fn execute_create_pool<S: PoolWriter>(
    store: &mut S,
    ctx: &ExecutionContext<'_>,
    journal: &mut TransferJournal,
    caller: &Address,
    params: &PoolParams,
) -> StateResult<PoolId> {
    validate_params(ctx, params)?;

    if store.pool_index(&params.pool_name).is_some() {
        return Err(StateError::DuplicatePoolName {
            name: params.pool_name.clone(),
        });
    }

    if !params.deposit.is_zero() {
        check_pull(ctx, caller, params.deposit)?;
        journal.pull(*caller, ctx.escrow, params.deposit)?;
    }

    let pool_id = store.pools_len();
    store.insert_pool(Pool::new(pool_id, *caller, params.clone(), ctx.now));

    tracing::info!(
        pool_id,
        name = %params.pool_name,
        deposit = %params.deposit,
        "pool created"
    );
    Ok(pool_id)
}

fn validate_params(ctx: &ExecutionContext<'_>, params: &PoolParams) -> StateResult<()> {
    fn invalid(reason: &str) -> StateResult<()> {
        Err(StateError::InvalidPoolParams {
            reason: reason.to_string(),
        })
    }

    if params.pool_name.is_empty() {
        return invalid("pool name is empty");
    }
    if params.pool_name.len() > ctx.config.max_pool_name_len {
        return invalid("pool name too long");
    }
    if params.report_url.len() > ctx.config.max_report_url_len {
        return invalid("report url too long");
    }
    if params.pay_period_length == 0 {
        return invalid("pay period length must be positive");
    }
    if params.min_stake.is_zero() {
        return invalid("min stake must be positive");
    }
    if params.max_total_stake < params.min_stake {
        return invalid("max total stake below min stake");
    }
    if params.bonus_expert_factor > ctx.config.max_bonus_bps
        || params.bonus_first_expert_factor > ctx.config.max_bonus_bps
    {
        return invalid("bonus factor above ceiling");
    }
    Ok(())
}
