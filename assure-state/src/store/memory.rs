//! In-memory pool store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use assure_core::{Address, Pool, PoolId, Stake};

use super::traits::{PoolReader, PoolWriter};

/// In-memory pool store.
///
/// Ordered maps keep stake iteration deterministic, which payout
/// apportioning relies on. The whole store serializes as one snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryPoolStore {
    /// Pools indexed by id.
    pub pools: Vec<Pool>,

    /// Pool name to id.
    pub names: BTreeMap<String, PoolId>,

    /// Positions keyed by (pool, staker).
    pub stakes: BTreeMap<(PoolId, Address), Stake>,

    /// Next envelope nonce per signer.
    pub nonces: BTreeMap<Address, u64>,
}

impl MemoryPoolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of open positions across all pools.
    pub fn stake_record_count(&self) -> usize {
        self.stakes.len()
    }
}

impl PoolReader for MemoryPoolStore {
    fn get_pool(&self, pool_id: PoolId) -> Option<&Pool> {
        usize::try_from(pool_id).ok().and_then(|i| self.pools.get(i))
    }

    fn pools_len(&self) -> u64 {
        self.pools.len() as u64
    }

    fn pool_index(&self, name: &str) -> Option<PoolId> {
        self.names.get(name).copied()
    }

    fn get_stake(&self, pool_id: PoolId, staker: &Address) -> Option<&Stake> {
        self.stakes.get(&(pool_id, *staker))
    }

    fn stakes_of(&self, pool_id: PoolId) -> Vec<(Address, &Stake)> {
        self.stakes
            .range((pool_id, [0u8; 20])..=(pool_id, [0xFFu8; 20]))
            .map(|((_, staker), stake)| (*staker, stake))
            .collect()
    }

    fn nonce(&self, signer: &Address) -> u64 {
        self.nonces.get(signer).copied().unwrap_or(0)
    }
}

impl PoolWriter for MemoryPoolStore {
    fn insert_pool(&mut self, pool: Pool) {
        debug_assert_eq!(pool.pool_id, self.pools.len() as u64);
        self.names.insert(pool.name.clone(), pool.pool_id);
        self.pools.push(pool);
    }

    fn update_pool<F>(&mut self, pool_id: PoolId, f: F)
    where
        F: FnOnce(&mut Pool),
    {
        if let Some(pool) = usize::try_from(pool_id).ok().and_then(|i| self.pools.get_mut(i)) {
            f(pool);
        }
    }

    fn put_stake(&mut self, pool_id: PoolId, staker: Address, stake: Stake) {
        self.stakes.insert((pool_id, staker), stake);
    }

    fn take_stake(&mut self, pool_id: PoolId, staker: &Address) -> Option<Stake> {
        self.stakes.remove(&(pool_id, *staker))
    }

    fn bump_nonce(&mut self, signer: &Address) {
        *self.nonces.entry(*signer).or_insert(0) += 1;
    }
}
