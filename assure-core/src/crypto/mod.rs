//! Cryptographic primitives for the Assure protocol.
//!
//! This module provides:
//! - Ed25519 key pair generation, signing, and verification
//! - SHA-256 hashing
//! - Account address derivation (first 20 bytes of SHA-256 of public key)

mod address;
mod hashing;
mod keys;
mod signing;

pub use address::derive_address;
pub use hashing::sha256;
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use signing::{sign, verify, Signature};
