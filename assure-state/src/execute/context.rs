//! Execution context for operation processing.

use assure_core::{Address, Tick};

use crate::config::ProtocolConfig;
use crate::external::{ExpertOracle, Ledger, PolicyOracle};

/// Call-level information shared by every handler.
///
/// `now` is read from the clock once per call. Collaborators are borrowed
/// read-only: handlers may query the ledger but never move tokens; transfers
/// are staged in a [`TransferJournal`](super::TransferJournal) and committed
/// by the caller.
pub struct ExecutionContext<'a> {
    /// Current tick.
    pub now: Tick,

    /// Protocol escrow account on the ledger.
    pub escrow: Address,

    /// Pool creation limits.
    pub config: &'a ProtocolConfig,

    /// Token ledger, for allowance and balance pre-checks.
    pub ledger: &'a dyn Ledger,

    /// Expert registry.
    pub experts: &'a dyn ExpertOracle,

    /// Policy oracle.
    pub policy: &'a dyn PolicyOracle,
}

impl<'a> ExecutionContext<'a> {
    /// Create a new execution context.
    pub fn new(
        now: Tick,
        escrow: Address,
        config: &'a ProtocolConfig,
        ledger: &'a dyn Ledger,
        experts: &'a dyn ExpertOracle,
        policy: &'a dyn PolicyOracle,
    ) -> Self {
        Self {
            now,
            escrow,
            config,
            ledger,
            experts,
            policy,
        }
    }
}

impl std::fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("now", &self.now)
            .field("escrow", &assure_core::address_to_hex(&self.escrow))
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
