//! Protocol operations.
//!
//! An [`Operation`] is one of the eight mutating calls. Submitted over the
//! wire it travels inside a [`SignedOperation`], whose signer's address is
//! the caller identity the protocol authorizes against.

mod signed;
mod types;

pub use signed::SignedOperation;
pub use types::{Operation, OperationKind};
