//! External collaborators.
//!
//! The protocol consumes, but does not own, a token ledger, an expert
//! registry, a policy oracle and a time source. Each is a narrow trait; the
//! in-memory implementations here back tests and the devnet node.

mod clock;
mod ledger;
mod oracle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::{Ledger, LedgerError, MemoryLedger};
pub use oracle::{ExpertOracle, ManualPolicyOracle, OracleError, PolicyOracle, StaticExpertList};
