//! Read-only pool and account queries.

use std::sync::Arc;

use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;

use assure_core::address_to_hex;
use assure_state::{Ledger, StateError};

use super::types::{PoolInfo, StakeInfo};
use super::{format_u256, parse_address, state_error, RpcState};

/// Register query RPC methods.
pub fn register_methods(module: &mut RpcModule<Arc<RpcState>>) -> anyhow::Result<()> {
    // get_pool(pool_id) -> Option<PoolInfo>
    module.register_async_method("get_pool", |params, state, _| async move {
        let pool_id: u64 = params.one()?;
        let protocol = state.protocol.read().await;

        Ok::<_, ErrorObjectOwned>(protocol.get_pool(pool_id).ok().map(PoolInfo::from))
    })?;

    // get_pool_state(pool_id) -> String ("none" for unknown ids)
    module.register_async_method("get_pool_state", |params, state, _| async move {
        let pool_id: u64 = params.one()?;
        let protocol = state.protocol.read().await;

        Ok::<_, ErrorObjectOwned>(protocol.get_pool_state(pool_id).name().to_string())
    })?;

    module.register_async_method("get_pools_length", |_params, state, _| async move {
        let protocol = state.protocol.read().await;
        Ok::<_, ErrorObjectOwned>(protocol.get_pools_length())
    })?;

    // get_pool_index(name) -> Option<u64>
    module.register_async_method("get_pool_index", |params, state, _| async move {
        let name: String = params.one()?;
        let protocol = state.protocol.read().await;

        Ok::<_, ErrorObjectOwned>(protocol.get_pool_index(&name))
    })?;

    // get_stake(pool_id, address) -> Option<StakeInfo>
    module.register_async_method("get_stake", |params, state, _| async move {
        let (pool_id, address): (u64, String) = params.parse()?;
        let staker = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        Ok::<_, ErrorObjectOwned>(protocol.get_stake(pool_id, &staker).ok().map(StakeInfo::from))
    })?;

    // compute_payout(pool_id, address) -> hex amount
    module.register_async_method("compute_payout", |params, state, _| async move {
        let (pool_id, address): (u64, String) = params.parse()?;
        let staker = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        let owed = protocol
            .compute_payout(pool_id, &staker)
            .map_err(state_error)?;
        Ok::<_, ErrorObjectOwned>(format_u256(&owed))
    })?;

    // compute_period_payout(pool_id, address) -> hex amount
    module.register_async_method("compute_period_payout", |params, state, _| async move {
        let (pool_id, address): (u64, String) = params.parse()?;
        let staker = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        let share = protocol
            .compute_period_payout(pool_id, &staker)
            .map_err(state_error)?;
        Ok::<_, ErrorObjectOwned>(format_u256(&share))
    })?;

    module.register_async_method("is_expert", |params, state, _| async move {
        let address: String = params.one()?;
        let who = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        protocol.is_expert(&who).map_err(state_error)
    })?;

    // get_nonce(address) -> next envelope nonce
    module.register_async_method("get_nonce", |params, state, _| async move {
        let address: String = params.one()?;
        let signer = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        Ok::<_, ErrorObjectOwned>(protocol.nonce(&signer))
    })?;

    // get_balance(address) -> hex amount
    module.register_async_method("get_balance", |params, state, _| async move {
        let address: String = params.one()?;
        let holder = parse_address(&address)?;
        let protocol = state.protocol.read().await;

        let balance = protocol
            .ledger()
            .balance_of(&holder)
            .map_err(|e| state_error(StateError::LedgerCallFailed(e.to_string())))?;
        Ok::<_, ErrorObjectOwned>(format_u256(&balance))
    })?;

    // get_escrow() -> escrow address
    module.register_async_method("get_escrow", |_params, state, _| async move {
        let protocol = state.protocol.read().await;
        Ok::<_, ErrorObjectOwned>(address_to_hex(protocol.escrow()))
    })?;

    Ok(())
}
