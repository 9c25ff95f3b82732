//! Error types for the Assure core crate.

use std::fmt;

/// Top-level error type for assure-core operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Cryptographic operation failed.
    Crypto(CryptoError),
    /// Serialization or deserialization failed.
    Serialization(SerializationError),
    /// A hex-encoded address could not be parsed.
    InvalidAddress(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Crypto(e) => write!(f, "crypto error: {}", e),
            CoreError::Serialization(e) => write!(f, "serialization error: {}", e),
            CoreError::InvalidAddress(msg) => write!(f, "invalid address: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<CryptoError> for CoreError {
    fn from(e: CryptoError) -> Self {
        CoreError::Crypto(e)
    }
}

impl From<SerializationError> for CoreError {
    fn from(e: SerializationError) -> Self {
        CoreError::Serialization(e)
    }
}

/// Errors related to cryptographic operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// The public key is malformed or invalid.
    InvalidPublicKey,
    /// Signature verification failed (signature doesn't match message/key).
    SignatureVerificationFailed,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidPublicKey => write!(f, "invalid public key format"),
            CryptoError::SignatureVerificationFailed => write!(f, "signature verification failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Errors related to serialization and deserialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to encode data to bytes.
    EncodeFailed(String),
    /// Failed to decode data from bytes.
    DecodeFailed(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            SerializationError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}
