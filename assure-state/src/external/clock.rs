//! Tick sources.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use assure_core::Tick;

/// Source of the current tick. Read once per protocol call.
pub trait Clock {
    /// Current tick.
    fn now(&self) -> Tick;
}

/// Wall-clock seconds since the unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Tick {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually advanced clock. Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    tick: Arc<AtomicU64>,
}

impl ManualClock {
    /// Start at `tick`.
    pub fn new(tick: Tick) -> Self {
        Self {
            tick: Arc::new(AtomicU64::new(tick)),
        }
    }

    /// Advance by `ticks` and return the new tick.
    pub fn advance(&self, ticks: Tick) -> Tick {
        self.tick.fetch_add(ticks, Ordering::SeqCst) + ticks
    }

    /// Jump to an absolute tick.
    pub fn set(&self, tick: Tick) {
        self.tick.store(tick, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }
}
