//! Pool storage traits.
//!
//! The executor is written against these traits so that an operation can
//! run on a staged copy of the store and be committed by swapping it in.

use assure_core::{Address, Pool, PoolId, Stake};

/// Read access to pool state.
pub trait PoolReader {
    /// Get a pool by id.
    fn get_pool(&self, pool_id: PoolId) -> Option<&Pool>;

    /// Check if a pool exists.
    fn pool_exists(&self, pool_id: PoolId) -> bool {
        self.get_pool(pool_id).is_some()
    }

    /// Number of pools ever created.
    fn pools_len(&self) -> u64;

    /// Look up a pool id by its unique name.
    fn pool_index(&self, name: &str) -> Option<PoolId>;

    /// Get one staker's position.
    fn get_stake(&self, pool_id: PoolId, staker: &Address) -> Option<&Stake>;

    /// All positions in a pool, ordered by staker address.
    fn stakes_of(&self, pool_id: PoolId) -> Vec<(Address, &Stake)>;

    /// Next expected envelope nonce for a signer.
    fn nonce(&self, signer: &Address) -> u64;
}

/// Mutable access to pool state.
///
/// These are raw setters. Protocol code goes through the accounting
/// helpers, which keep `total_staked`, `pool_weighted_size` and
/// `stake_count` consistent with the stake records.
pub trait PoolWriter: PoolReader {
    /// Insert a new pool. Its id must equal `pools_len()`.
    fn insert_pool(&mut self, pool: Pool);

    /// Update an existing pool.
    fn update_pool<F>(&mut self, pool_id: PoolId, f: F)
    where
        F: FnOnce(&mut Pool);

    /// Insert or replace a staker's position.
    fn put_stake(&mut self, pool_id: PoolId, staker: Address, stake: Stake);

    /// Remove a staker's position.
    fn take_stake(&mut self, pool_id: PoolId, staker: &Address) -> Option<Stake>;

    /// Advance a signer's nonce by one.
    fn bump_nonce(&mut self, signer: &Address);
}

/// Combined trait for full store access.
pub trait PoolStore: PoolReader + PoolWriter {}

impl<T: PoolReader + PoolWriter> PoolStore for T {}
