//! Operation execution module.
//!
//! This module contains the operation executor and all operation-specific
//! validation and execution logic.

mod context;
mod deposit;
mod executor;
mod journal;
mod observe;
mod policy;
mod pool;
mod stake;

pub use context::ExecutionContext;
pub use executor::{apply_operation, apply_signed_operation, OperationReceipt};
pub use journal::{Transfer, TransferJournal, TransferKind};
