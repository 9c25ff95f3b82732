//! Protocol-level limits.

use serde::{Deserialize, Serialize};

/// Default cap on pool name length (bytes).
pub const DEFAULT_MAX_POOL_NAME_LEN: usize = 64;

/// Default cap on report URL length (bytes).
pub const DEFAULT_MAX_REPORT_URL_LEN: usize = 256;

/// Default ceiling for either bonus factor (basis points). 100_000 = 10x.
pub const DEFAULT_MAX_BONUS_BPS: u32 = 100_000;

/// Limits applied when a pool is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Longest accepted pool name.
    pub max_pool_name_len: usize,
    /// Longest accepted report URL.
    pub max_report_url_len: usize,
    /// Highest accepted bonus factor.
    pub max_bonus_bps: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_pool_name_len: DEFAULT_MAX_POOL_NAME_LEN,
            max_report_url_len: DEFAULT_MAX_REPORT_URL_LEN,
            max_bonus_bps: DEFAULT_MAX_BONUS_BPS,
        }
    }
}
