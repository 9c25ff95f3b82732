//! Signed operation envelope.

use serde::{Deserialize, Serialize};

use crate::crypto::{derive_address, sign, verify, KeyPair, PublicKey, Signature};
use crate::error::CoreError;
use crate::serialization::serialize;
use crate::types::Address;

use super::Operation;

/// An operation signed by the caller's account key.
///
/// The signature covers `(nonce, op)`. The nonce must equal the signer's
/// count of previously accepted operations, which makes every envelope
/// single-use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOperation {
    /// The operation payload.
    pub op: Operation,

    /// Per-signer sequence number.
    pub nonce: u64,

    /// The public key of the signer.
    pub signer: PublicKey,

    /// Ed25519 signature of the serialized `(nonce, op)`.
    pub signature: Signature,
}

impl SignedOperation {
    /// Sign an operation with a key pair.
    pub fn create(op: Operation, nonce: u64, keypair: &KeyPair) -> Result<Self, CoreError> {
        let bytes = signing_bytes(&op, nonce)?;
        let signature = sign(keypair.signing_key(), &bytes);
        Ok(Self {
            op,
            nonce,
            signer: keypair.public_key(),
            signature,
        })
    }

    /// Address of the signer (the caller identity).
    pub fn caller(&self) -> Address {
        derive_address(&self.signer)
    }

    /// Verify the signature over `(nonce, op)`.
    pub fn verify_signature(&self) -> Result<(), CoreError> {
        let bytes = signing_bytes(&self.op, self.nonce)?;
        verify(&self.signer, &bytes, &self.signature)?;
        Ok(())
    }
}

fn signing_bytes(op: &Operation, nonce: u64) -> Result<Vec<u8>, CoreError> {
    serialize(&(nonce, op)).map_err(CoreError::from)
}
