//! Account address derivation.
//!
//! Pool owners and stakers are identified by 20-byte addresses: the first
//! 20 bytes of the SHA-256 hash of their Ed25519 public key.

use super::hashing::sha256;
use super::keys::PublicKey;
use crate::types::Address;

/// Derive an account address from a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    let hash = sha256(public_key.as_bytes());
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[..20]);
    address
}
