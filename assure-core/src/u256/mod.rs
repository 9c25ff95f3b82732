//! 256-bit unsigned integer arithmetic for token amounts.
//!
//! Every amount in the protocol (stakes, deposits, payouts, caps) is a
//! `U256` so that pool arithmetic stays integer-only. Payout apportioning
//! multiplies a weighted stake by the per-period payout before dividing, so
//! the headroom above `u128` matters.

// Allow clippy warnings from the uint crate's construct_uint macro
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::assign_op_pattern)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uint::construct_uint;

use crate::types::BPS_DENOMINATOR;

construct_uint! {
    /// 256-bit unsigned integer.
    ///
    /// Used for:
    /// - Stake and weighted stake amounts
    /// - Owner deposits and payout amounts
    /// - Ledger balances and allowances
    pub struct U256(4);
}

impl U256 {
    /// Create a U256 from a u64 value.
    #[inline]
    pub const fn from_u64(value: u64) -> Self {
        U256([value, 0, 0, 0])
    }

    /// Convert to u64, returning None if the value doesn't fit.
    #[inline]
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0 {
            Some(self.0[0])
        } else {
            None
        }
    }

    /// Scale by a basis-point multiplier (`self * bps / 10_000`), flooring.
    ///
    /// Returns `None` on overflow.
    pub fn checked_mul_bps(&self, bps: u32) -> Option<Self> {
        self.checked_mul(U256::from(u64::from(bps)))
            .map(|scaled| scaled / U256::from(u64::from(BPS_DENOMINATOR)))
    }

    /// Parse an amount from either `0x`-prefixed hex or plain decimal.
    pub fn parse_amount(text: &str) -> Option<Self> {
        match text.strip_prefix("0x") {
            Some("") => None,
            Some(hex) => U256::from_str_radix(hex, 16).ok(),
            None if text.is_empty() => None,
            None => U256::from_dec_str(text).ok(),
        }
    }

    /// Serialize to little-endian bytes.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    /// Deserialize from little-endian bytes.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        U256(limbs)
    }
}

// Fixed-width little-endian bytes keep bincode output deterministic.
impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_le_bytes())
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct U256Visitor;

        impl<'de> serde::de::Visitor<'de> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("32 bytes")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<U256, E> {
                let bytes: [u8; 32] = v
                    .try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(U256::from_le_bytes(&bytes))
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<U256, A::Error> {
                let mut bytes = [0u8; 32];
                for (i, byte) in bytes.iter_mut().enumerate() {
                    *byte = seq
                        .next_element()?
                        .ok_or_else(|| serde::de::Error::invalid_length(i, &self))?;
                }
                Ok(U256::from_le_bytes(&bytes))
            }
        }

        deserializer.deserialize_bytes(U256Visitor)
    }
}
