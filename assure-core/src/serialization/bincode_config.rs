//! Deterministic bincode configuration.
//!
//! Fixed-size integer encoding, little-endian, trailing bytes rejected.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::SerializationError;

fn config() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Serialize a value to bytes using deterministic configuration.
pub fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    config()
        .serialize(value)
        .map_err(|e| SerializationError::EncodeFailed(e.to_string()))
}

/// Deserialize a value from bytes.
///
/// Fails on malformed input or trailing bytes after the value.
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    config()
        .deserialize(bytes)
        .map_err(|e| SerializationError::DecodeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoolState;

    #[test]
    fn test_rejects_trailing_bytes() {
        let mut bytes = serialize(&42u64).unwrap();
        bytes.push(0xFF);
        assert!(deserialize::<u64>(&bytes).is_err());
    }

    #[test]
    fn test_fixed_int_little_endian() {
        assert_eq!(serialize(&0x01020304u32).unwrap(), vec![0x04, 0x03, 0x02, 0x01]);
        assert_eq!(serialize(&1u64).unwrap().len(), 8);
    }

    #[test]
    fn test_enum_tag_is_stable() {
        // variant index as u32
        assert_eq!(serialize(&PoolState::Initialized).unwrap(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(deserialize::<PoolState>(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
