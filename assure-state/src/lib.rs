// Allow functions with many parameters - operation handlers need context
#![allow(clippy::too_many_arguments)]

//! State machine and accounting for the Assure staking protocol.
//!
//! This crate implements every protocol rule: pool lifecycle, stake
//! accounting, interest payout, and per-operation admission. Given a store,
//! the collaborators, and an operation, it produces the next store and the
//! ledger transfers to perform, or an error. No networking.
//!
//! # Key Components
//!
//! - [`Protocol`]: façade running each call atomically
//! - [`PoolReader`]/[`PoolWriter`]: traits abstracting pool storage
//! - [`MemoryPoolStore`]: in-memory store, also the snapshot format
//! - [`advance`]/[`authorize`]: the state machine tables
//! - [`period_shares`]: largest-remainder payout split
//! - [`StateError`]: error type for validation failures
//!
//! # Example
//!
//! ```ignore
//! use assure_state::{ManualClock, ManualPolicyOracle, MemoryLedger, Protocol, StaticExpertList};
//!
//! let mut protocol = Protocol::new(
//!     MemoryLedger::new(),
//!     StaticExpertList::default(),
//!     ManualPolicyOracle::new(),
//!     ManualClock::new(0),
//!     escrow,
//! );
//! let pool_id = protocol.create_pool(&owner, params)?;
//! protocol.stake_funds(&staker, pool_id, amount)?;
//! ```

mod config;
mod error;
mod execute;
mod external;
mod machine;
mod payout;
mod protocol;
mod store;

pub use config::ProtocolConfig;
pub use error::{ErrorKind, StateError, StateResult};
pub use execute::{
    apply_operation, apply_signed_operation, ExecutionContext, OperationReceipt, Transfer,
    TransferJournal, TransferKind,
};
pub use external::{
    Clock, ExpertOracle, Ledger, LedgerError, ManualClock, ManualPolicyOracle, MemoryLedger,
    OracleError, PolicyOracle, StaticExpertList, SystemClock,
};
pub use machine::{advance, authorize, next_transition, Transition, Verdict};
pub use payout::{owed_interest, period_payout, period_shares};
pub use protocol::Protocol;
pub use store::{MemoryPoolStore, PoolReader, PoolStore, PoolWriter};
