//! Per-operation admission table.

use assure_core::{OperationKind, PoolState};

/// What an operation may do once the pool has been advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Run the operation's effects.
    Proceed,
    /// Persist the advance, move no funds, succeed.
    TransitionOnly,
    /// Fail with no state change.
    Reject,
}

/// Decide an operation given the pool state before and after the advance.
///
/// `violated` is the policy reading taken for this call; it only matters
/// for `check_policy`, which must not take credit for a timeout.
pub fn authorize(kind: OperationKind, before: PoolState, after: PoolState, violated: bool) -> Verdict {
    use PoolState::*;
    use Verdict::*;

    match kind {
        OperationKind::CreatePool => Proceed,

        OperationKind::StakeFunds => match after {
            Initialized | NotViolatedFunded | NotViolatedUnderfunded => Proceed,
            _ => Reject,
        },

        OperationKind::WithdrawStake => match after {
            NotViolatedUnderfunded | ViolatedUnderfunded | PolicyExpired | Cancelled => Proceed,
            _ => Reject,
        },

        OperationKind::DepositFunds => match (before, after) {
            (_, Initialized | NotViolatedFunded | NotViolatedUnderfunded | PolicyExpired) => Proceed,
            (PolicyExpired, Cancelled) => TransitionOnly,
            _ => Reject,
        },

        OperationKind::WithdrawDeposit => match (before, after) {
            (_, Initialized | PolicyExpired | Cancelled) => Proceed,
            (NotViolatedFunded, ViolatedFunded) => TransitionOnly,
            _ => Reject,
        },

        OperationKind::WithdrawInterest => match (before, after) {
            (_, NotViolatedFunded | NotViolatedUnderfunded | PolicyExpired) => Proceed,
            (PolicyExpired, Cancelled) => TransitionOnly,
            _ => Reject,
        },

        OperationKind::WithdrawClaim => match (before, after) {
            (_, ViolatedFunded | PolicyExpired) => Proceed,
            (NotViolatedUnderfunded, ViolatedUnderfunded) => TransitionOnly,
            (PolicyExpired, Cancelled) => TransitionOnly,
            _ => Reject,
        },

        OperationKind::CheckPolicy => match (before, after) {
            (Cancelled, _) => Reject,
            (_, ViolatedFunded | ViolatedUnderfunded) => TransitionOnly,
            (PolicyExpired, PolicyExpired) => TransitionOnly,
            (Initialized, Cancelled) if violated => TransitionOnly,
            _ => Reject,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PoolState::*;

    const LIVE: [PoolState; 7] = [
        Initialized,
        NotViolatedFunded,
        NotViolatedUnderfunded,
        ViolatedFunded,
        ViolatedUnderfunded,
        PolicyExpired,
        Cancelled,
    ];

    fn steady(kind: OperationKind, state: PoolState) -> Verdict {
        authorize(kind, state, state, false)
    }

    #[test]
    fn test_stake_only_before_violation_or_expiry() {
        for state in LIVE {
            let expected = matches!(state, Initialized | NotViolatedFunded | NotViolatedUnderfunded);
            assert_eq!(
                steady(OperationKind::StakeFunds, state) == Verdict::Proceed,
                expected,
                "{state}"
            );
        }
    }

    #[test]
    fn test_withdraw_stake_columns() {
        assert_eq!(steady(OperationKind::WithdrawStake, Initialized), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawStake, NotViolatedFunded), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawStake, ViolatedFunded), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawStake, NotViolatedUnderfunded), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawStake, ViolatedUnderfunded), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawStake, PolicyExpired), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawStake, Cancelled), Verdict::Proceed);
    }

    #[test]
    fn test_deposit_after_expiry_is_transition_only() {
        assert_eq!(steady(OperationKind::DepositFunds, PolicyExpired), Verdict::Proceed);
        assert_eq!(
            authorize(OperationKind::DepositFunds, PolicyExpired, Cancelled, false),
            Verdict::TransitionOnly
        );
        assert_eq!(steady(OperationKind::DepositFunds, Cancelled), Verdict::Reject);
        assert_eq!(steady(OperationKind::DepositFunds, ViolatedUnderfunded), Verdict::Reject);
    }

    #[test]
    fn test_withdraw_deposit_columns() {
        assert_eq!(steady(OperationKind::WithdrawDeposit, Initialized), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawDeposit, Cancelled), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawDeposit, NotViolatedFunded), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawDeposit, ViolatedFunded), Verdict::Reject);
        assert_eq!(
            authorize(OperationKind::WithdrawDeposit, NotViolatedFunded, ViolatedFunded, true),
            Verdict::TransitionOnly
        );
    }

    #[test]
    fn test_withdraw_interest_on_fresh_cancel() {
        assert_eq!(
            authorize(OperationKind::WithdrawInterest, PolicyExpired, Cancelled, false),
            Verdict::TransitionOnly
        );
        assert_eq!(steady(OperationKind::WithdrawInterest, Cancelled), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawInterest, Initialized), Verdict::Reject);
        assert_eq!(steady(OperationKind::WithdrawInterest, NotViolatedUnderfunded), Verdict::Proceed);
    }

    #[test]
    fn test_withdraw_interest_on_timeout_rejected() {
        assert_eq!(
            authorize(OperationKind::WithdrawInterest, Initialized, Cancelled, false),
            Verdict::Reject
        );
    }

    #[test]
    fn test_withdraw_claim_columns() {
        assert_eq!(steady(OperationKind::WithdrawClaim, ViolatedFunded), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawClaim, PolicyExpired), Verdict::Proceed);
        assert_eq!(steady(OperationKind::WithdrawClaim, ViolatedUnderfunded), Verdict::Reject);
        assert_eq!(
            authorize(OperationKind::WithdrawClaim, NotViolatedUnderfunded, ViolatedUnderfunded, true),
            Verdict::TransitionOnly
        );
        assert_eq!(
            authorize(OperationKind::WithdrawClaim, PolicyExpired, Cancelled, false),
            Verdict::TransitionOnly
        );
        assert_eq!(steady(OperationKind::WithdrawClaim, Cancelled), Verdict::Reject);
    }

    #[test]
    fn test_check_policy_columns() {
        assert_eq!(steady(OperationKind::CheckPolicy, NotViolatedFunded), Verdict::Reject);
        assert_eq!(steady(OperationKind::CheckPolicy, ViolatedFunded), Verdict::TransitionOnly);
        assert_eq!(steady(OperationKind::CheckPolicy, PolicyExpired), Verdict::TransitionOnly);
        assert_eq!(steady(OperationKind::CheckPolicy, Cancelled), Verdict::Reject);
        assert_eq!(
            authorize(OperationKind::CheckPolicy, Initialized, Cancelled, true),
            Verdict::TransitionOnly
        );
        assert_eq!(
            authorize(OperationKind::CheckPolicy, Initialized, Cancelled, false),
            Verdict::Reject
        );
    }

    #[test]
    fn test_check_policy_ignores_expiry() {
        assert_eq!(
            authorize(OperationKind::CheckPolicy, NotViolatedFunded, PolicyExpired, false),
            Verdict::Reject
        );
        assert_eq!(
            authorize(OperationKind::CheckPolicy, NotViolatedUnderfunded, PolicyExpired, false),
            Verdict::Reject
        );
    }
}
