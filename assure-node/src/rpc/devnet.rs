//! Devnet control RPC methods.
//!
//! Every method here fails with "Devnet mode not enabled" unless the node
//! was started with `--devnet`.

use std::sync::Arc;

use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;

use assure_state::{Ledger, LedgerError, StateError};

use crate::devnet::DevnetConfig;

use super::{format_u256, parse_address, parse_u256, state_error, RpcState, METHOD_DISABLED};

fn require_devnet(state: &RpcState) -> Result<&DevnetConfig, ErrorObjectOwned> {
    state.devnet.as_ref().ok_or_else(|| {
        ErrorObjectOwned::owned(METHOD_DISABLED, "Devnet mode not enabled", None::<()>)
    })
}

fn ledger_failure(err: LedgerError) -> ErrorObjectOwned {
    state_error(StateError::LedgerCallFailed(err.to_string()))
}

/// Register devnet RPC methods.
pub fn register_methods(module: &mut RpcModule<Arc<RpcState>>) -> anyhow::Result<()> {
    // devnet_advance(ticks = 1) -> new tick
    module.register_async_method("devnet_advance", |params, state, _| async move {
        require_devnet(&state)?;
        let ticks: u64 = params.one().unwrap_or(1);

        let clock = state.clock.as_ref().ok_or_else(|| {
            ErrorObjectOwned::owned(METHOD_DISABLED, "Node runs on the system clock", None::<()>)
        })?;

        // Hold the writer lock so no operation sees a half-advanced tick
        let _protocol = state.protocol.write().await;
        let now = clock.advance(ticks);
        tracing::debug!("Advanced manual clock by {} to tick {}", ticks, now);

        Ok::<_, ErrorObjectOwned>(now)
    })?;

    // devnet_mint(address, amount = faucet) -> new balance
    module.register_async_method("devnet_mint", |params, state, _| async move {
        let devnet = require_devnet(&state)?;
        let mut seq = params.sequence();
        let address: String = seq.next()?;
        let amount: Option<String> = seq.optional_next()?;

        let to = parse_address(&address)?;
        let amount = match amount {
            Some(text) => parse_u256(&text)?,
            None => devnet.faucet_amount,
        };

        let mut protocol = state.protocol.write().await;
        protocol.ledger_mut().mint(&to, amount);
        let balance = protocol.ledger().balance_of(&to).map_err(ledger_failure)?;

        Ok::<_, ErrorObjectOwned>(format_u256(&balance))
    })?;

    // devnet_approve(owner, amount) - set owner's allowance for the escrow
    module.register_async_method("devnet_approve", |params, state, _| async move {
        require_devnet(&state)?;
        let (address, amount): (String, String) = params.parse()?;
        let owner = parse_address(&address)?;
        let amount = parse_u256(&amount)?;

        let mut protocol = state.protocol.write().await;
        let escrow = *protocol.escrow();
        protocol
            .ledger_mut()
            .approve(&owner, &escrow, amount)
            .map_err(ledger_failure)?;

        Ok::<_, ErrorObjectOwned>(true)
    })?;

    // devnet_set_violated(target, violated)
    module.register_async_method("devnet_set_violated", |params, state, _| async move {
        require_devnet(&state)?;
        let (address, violated): (String, bool) = params.parse()?;
        let target = parse_address(&address)?;

        let mut protocol = state.protocol.write().await;
        protocol.policy_mut().set_violated(target, violated);

        Ok::<_, ErrorObjectOwned>(violated)
    })?;

    // devnet_set_expert(address, expert)
    module.register_async_method("devnet_set_expert", |params, state, _| async move {
        require_devnet(&state)?;
        let (address, expert): (String, bool) = params.parse()?;
        let who = parse_address(&address)?;

        let mut protocol = state.protocol.write().await;
        if expert {
            protocol.experts_mut().grant(who);
        } else {
            protocol.experts_mut().revoke(&who);
        }

        Ok::<_, ErrorObjectOwned>(expert)
    })?;

    Ok(())
}
