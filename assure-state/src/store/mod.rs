//! Pool store.
//!
//! - [`PoolReader`]: read-only access to pools, stakes and nonces
//! - [`PoolWriter`]: raw mutable access
//! - [`PoolStore`]: combined trait
//! - [`MemoryPoolStore`]: in-memory, BTreeMap-backed implementation
//! - accounting helpers that keep pool totals in step with stakes

mod accounting;
mod memory;
mod traits;

pub use memory::MemoryPoolStore;
pub use traits::{PoolReader, PoolStore, PoolWriter};

pub(crate) use accounting::{
    add_stake, credit_deposit, debit_deposit, drain_stakes, remove_stake, set_state,
};
