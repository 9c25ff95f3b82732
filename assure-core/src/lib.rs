//! # Assure Core
//!
//! Core types, cryptography, and serialization for the Assure staking protocol.
//!
//! This crate provides the foundation for the other Assure crates:
//! - Cryptographic primitives (Ed25519 signatures, SHA-256 hashing)
//! - Protocol data types (Pool, Stake, PoolState)
//! - Operation types (the eight mutating protocol calls) and the signed envelope
//! - 256-bit token amounts
//! - Deterministic binary serialization

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod operation;
pub mod serialization;
pub mod types;
pub mod u256;

// Re-export commonly used types at crate root
pub use crypto::{KeyPair, PublicKey, SecretKey, Signature};
pub use error::{CoreError, CryptoError, SerializationError};
pub use operation::{Operation, OperationKind, SignedOperation};
pub use types::{
    address_from_hex, address_to_hex, Address, Pool, PoolId, PoolParams, PoolState, Stake, Tick,
    BPS_DENOMINATOR,
};
pub use u256::U256;
