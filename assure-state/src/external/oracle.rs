//! Expert registry and policy oracle.

use std::collections::BTreeSet;

use thiserror::Error;

use assure_core::Address;

/// Failure of an oracle call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("oracle call failed: {0}")]
pub struct OracleError(pub String);

/// Answers whether an address is a recognized expert.
pub trait ExpertOracle {
    /// Whether `who` is an expert right now.
    fn is_expert(&self, who: &Address) -> Result<bool, OracleError>;
}

/// Answers whether a policy is violated for a monitored contract.
pub trait PolicyOracle {
    /// Whether `policy` currently reports `target` as violated.
    fn is_violated(&self, policy: &Address, target: &Address) -> Result<bool, OracleError>;
}

/// Fixed expert allow-list.
#[derive(Clone, Debug, Default)]
pub struct StaticExpertList {
    experts: BTreeSet<Address>,
}

impl StaticExpertList {
    /// Create a list from known experts.
    pub fn new<I: IntoIterator<Item = Address>>(experts: I) -> Self {
        Self {
            experts: experts.into_iter().collect(),
        }
    }

    /// Add an expert.
    pub fn grant(&mut self, who: Address) {
        self.experts.insert(who);
    }

    /// Remove an expert.
    pub fn revoke(&mut self, who: &Address) {
        self.experts.remove(who);
    }
}

impl ExpertOracle for StaticExpertList {
    fn is_expert(&self, who: &Address) -> Result<bool, OracleError> {
        Ok(self.experts.contains(who))
    }
}

/// Policy oracle whose verdicts are set by hand.
///
/// Violations are keyed by monitored contract. Setting `unavailable`
/// makes every query fail, which exercises the abort path.
#[derive(Clone, Debug, Default)]
pub struct ManualPolicyOracle {
    violated: BTreeSet<Address>,
    unavailable: bool,
}

impl ManualPolicyOracle {
    /// Create an oracle that reports nothing violated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark or clear a violation on `target`.
    pub fn set_violated(&mut self, target: Address, violated: bool) {
        if violated {
            self.violated.insert(target);
        } else {
            self.violated.remove(&target);
        }
    }

    /// Make the oracle fail (or recover).
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }
}

impl PolicyOracle for ManualPolicyOracle {
    fn is_violated(&self, _policy: &Address, target: &Address) -> Result<bool, OracleError> {
        if self.unavailable {
            return Err(OracleError("policy oracle unavailable".into()));
        }
        Ok(self.violated.contains(target))
    }
}
