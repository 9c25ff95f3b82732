//! Trigger-driven transitions.

use assure_core::{Pool, PoolState, Tick};

/// Upper bound on chained transitions in one advance.
const MAX_STEPS: usize = 8;

/// A single state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Target state.
    pub to: PoolState,
    /// Whether `time_of_last_state_change` is reset.
    pub stamps: bool,
}

impl Transition {
    fn stamped(to: PoolState) -> Self {
        Self { to, stamps: true }
    }

    fn unstamped(to: PoolState) -> Self {
        Self { to, stamps: false }
    }
}

/// The next transition the triggers call for, if any.
///
/// Rules, highest priority first:
/// 1. `Cancelled` never moves.
/// 2. A violation moves the not-violated states to their violated twin,
///    and cancels an `Initialized` pool.
/// 3. An `Initialized` pool cancels once `timeout_duration` has passed.
/// 4. An active pool expires once `min_stake_duration` has passed.
/// 5. Funding: `Initialized` moves to funded or underfunded once staked
///    enough; active pools flip between funded and underfunded with the
///    deposit. The flip keeps the staking clock running.
/// 6. An expired pool cancels after a second `min_stake_duration`, or as
///    soon as it holds no stake.
pub fn next_transition(pool: &Pool, violated: bool, now: Tick) -> Option<Transition> {
    use PoolState::*;

    let elapsed = pool.time_in_state(now);
    match pool.state {
        None | Cancelled | ViolatedFunded | ViolatedUnderfunded => Option::None,

        Initialized if violated => Some(Transition::stamped(Cancelled)),
        Initialized if elapsed >= pool.timeout_duration => Some(Transition::stamped(Cancelled)),
        Initialized if pool.is_funded() => Some(Transition::stamped(NotViolatedFunded)),
        Initialized if pool.is_staked_enough() => Some(Transition::stamped(NotViolatedUnderfunded)),
        Initialized => Option::None,

        NotViolatedFunded if violated => Some(Transition::stamped(ViolatedFunded)),
        NotViolatedUnderfunded if violated => Some(Transition::stamped(ViolatedUnderfunded)),
        NotViolatedFunded | NotViolatedUnderfunded if elapsed >= pool.min_stake_duration => {
            Some(Transition::stamped(PolicyExpired))
        }
        NotViolatedFunded if !pool.is_funded() => {
            Some(Transition::unstamped(NotViolatedUnderfunded))
        }
        NotViolatedUnderfunded if pool.is_funded() => {
            Some(Transition::unstamped(NotViolatedFunded))
        }
        NotViolatedFunded | NotViolatedUnderfunded => Option::None,

        PolicyExpired if elapsed >= pool.min_stake_duration || pool.total_staked.is_zero() => {
            Some(Transition::stamped(Cancelled))
        }
        PolicyExpired => Option::None,
    }
}

/// Apply transitions until none applies. Returns the state before.
pub fn advance(pool: &mut Pool, violated: bool, now: Tick) -> PoolState {
    let before = pool.state;
    for _ in 0..MAX_STEPS {
        let Some(transition) = next_transition(pool, violated, now) else {
            break;
        };
        pool.state = transition.to;
        if transition.stamps {
            pool.time_of_last_state_change = now;
        }
    }
    before
}
