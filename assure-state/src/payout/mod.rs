//! Interest payout engine.
//!
//! One pay period pays out exactly `max_payout_per_period` across all
//! stakers, split by weighted stake. Integer division leaves a remainder
//! that is handed out one unit at a time (largest remainder first), so the
//! per-period shares always sum to the configured payout with no drift.

mod engine;

pub use engine::{owed_interest, period_payout, period_shares};
