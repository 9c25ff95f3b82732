//! Pool state machine.
//!
//! Two pure tables drive every mutating call:
//! - [`advance`]: the trigger-driven transitions (violation, timeout,
//!   expiry, funding), applied before the operation runs
//! - [`authorize`]: given the state before and after that advance, whether
//!   the operation proceeds, only persists the transition, or is rejected

mod authorize;
mod transition;

pub use authorize::{authorize, Verdict};
pub use transition::{advance, next_transition, Transition};
