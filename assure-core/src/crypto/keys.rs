//! Ed25519 key pair generation and management.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// Type alias for Ed25519 secret/signing key.
pub type SecretKey = SigningKey;

/// Ed25519 public key wrapper with raw-bytes serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub VerifyingKey);

impl PublicKey {
    /// Create a PublicKey from raw bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(bytes)
            .map(PublicKey)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Get the raw bytes of the public key.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// Get the inner VerifyingKey.
    #[inline]
    pub fn inner(&self) -> &VerifyingKey {
        &self.0
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PublicKeyVisitor;

        impl<'de> serde::de::Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("32 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<PublicKey, E> {
                let bytes: [u8; 32] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                PublicKey::from_bytes(&bytes).map_err(E::custom)
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<PublicKey, A::Error> {
                let mut bytes = [0u8; 32];
                for (i, byte) in bytes.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                PublicKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(PublicKeyVisitor)
    }
}

/// Ed25519 key pair for a pool owner or staker account.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using the OS random number generator.
    pub fn generate() -> Self {
        KeyPair {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte secret key.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        KeyPair {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Derive a key pair deterministically from a seed phrase.
    ///
    /// The secret key is SHA-256 of the seed. Only suitable for devnet
    /// accounts and tests.
    pub fn from_seed(seed: &str) -> Self {
        Self::from_bytes(&super::sha256(seed.as_bytes()))
    }

    /// Get the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key())
    }

    /// Get the signing (secret) key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Address derived from this key pair's public key.
    pub fn address(&self) -> crate::types::Address {
        super::derive_address(&self.public_key())
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        KeyPair {
            signing_key: SigningKey::from_bytes(self.signing_key.as_bytes()),
        }
    }
}
