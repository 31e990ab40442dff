//! Admission and outcome rules.
//!
//! Pure functions over a [`GuardState`]. Callers run each function inside a
//! single `StateStore::update` so the read and the write that depends on it
//! happen under the same lock.

use crate::policy::state::{GuardStatus, Transition};
use crate::store::state::GuardState;

/// Decision of the admission gate for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Status the call observed, after any Open → HalfOpen promotion.
    pub status_at_call_time: GuardStatus,
    /// Whether the wrapped operation may run.
    pub admitted: bool,
    /// Promotion performed by this call, if any.
    pub transition: Option<Transition>,
}

impl Admission {
    fn new(status_at_call_time: GuardStatus, admitted: bool) -> Self {
        Self {
            status_at_call_time,
            admitted,
            transition: None,
        }
    }
}

/// True when an open guard has waited out `cb_timeout_secs`.
pub fn is_timed_out(state: &GuardState, now: u64) -> bool {
    state.status() == GuardStatus::Open
        && state.seconds_since_transition(now) > state.config().cb_timeout_secs
}

/// True when failures in the window reached the threshold.
pub fn is_tripped(state: &mut GuardState, now: u64) -> bool {
    state.failures_in_window(now) >= state.config().threshold
}

/// Decide whether a call arriving at `now` may run.
///
/// A timed-out open guard is promoted to HalfOpen and the probe counter is
/// bumped in the same step, so the caller that promotes is the probe and any
/// later arrival sees the slot taken.
pub fn admit(state: &mut GuardState, now: u64) -> Admission {
    match state.status() {
        GuardStatus::Closed => Admission::new(GuardStatus::Closed, true),
        GuardStatus::Open if is_timed_out(state, now) => {
            let transition = state.set_status(GuardStatus::HalfOpen, now);
            state.increment_probe_calls();
            Admission {
                status_at_call_time: state.status(),
                admitted: true,
                transition,
            }
        }
        GuardStatus::Open => Admission::new(GuardStatus::Open, false),
        GuardStatus::HalfOpen => {
            // only reachable with a free slot when the status was written directly
            let admitted = state.probe_calls() == 0;
            if admitted {
                state.increment_probe_calls();
            }
            Admission::new(GuardStatus::HalfOpen, admitted)
        }
    }
}

/// Apply a call outcome observed by a call admitted under `status_at_call_time`.
///
/// Failures are always counted. The transition depends only on the status the
/// call was admitted under: a Closed-era failure opens the guard once the
/// window reaches the threshold, even if a probe is in flight, and a probe
/// outcome closes or reopens it. Writing Open over Open is a no-op, so a late
/// failure never extends a running cooldown.
pub fn process_result(
    state: &mut GuardState,
    failed: bool,
    status_at_call_time: GuardStatus,
    now: u64,
) -> Option<Transition> {
    if failed {
        state.record_failure(now);
        match status_at_call_time {
            GuardStatus::HalfOpen => state.set_status(GuardStatus::Open, now),
            GuardStatus::Closed if is_tripped(state, now) => state.set_status(GuardStatus::Open, now),
            _ => None,
        }
    } else if status_at_call_time == GuardStatus::HalfOpen {
        state.set_status(GuardStatus::Closed, now)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;

    const T0: u64 = 10_000;

    fn config() -> GuardConfig {
        GuardConfig {
            window_secs: 5,
            threshold: 3,
            request_timeout_secs: 30,
            cb_timeout_secs: 60,
        }
    }

    fn open_state() -> GuardState {
        let mut state = GuardState::new(config(), T0);
        state.set_status(GuardStatus::Open, T0);
        state
    }

    #[test]
    fn test_closed_admits_everything() {
        let mut state = GuardState::new(config(), T0);
        for _ in 0..5 {
            let admission = admit(&mut state, T0);
            assert!(admission.admitted);
            assert_eq!(admission.status_at_call_time, GuardStatus::Closed);
        }
        assert_eq!(state.probe_calls(), 0);
    }

    #[test]
    fn test_below_threshold_stays_closed() {
        let mut state = GuardState::new(config(), T0);
        assert_eq!(process_result(&mut state, true, GuardStatus::Closed, T0), None);
        assert_eq!(process_result(&mut state, true, GuardStatus::Closed, T0 + 1), None);
        assert_eq!(state.status(), GuardStatus::Closed);
    }

    #[test]
    fn test_threshold_trips_open() {
        let mut state = GuardState::new(config(), T0);
        process_result(&mut state, true, GuardStatus::Closed, T0);
        process_result(&mut state, true, GuardStatus::Closed, T0);

        let transition = process_result(&mut state, true, GuardStatus::Closed, T0 + 1);
        assert_eq!(transition, Some(Transition::new(GuardStatus::Closed, GuardStatus::Open)));
        assert_eq!(state.status(), GuardStatus::Open);
    }

    #[test]
    fn test_failures_outside_window_do_not_trip() {
        let mut state = GuardState::new(config(), T0);
        process_result(&mut state, true, GuardStatus::Closed, T0);
        process_result(&mut state, true, GuardStatus::Closed, T0);
        process_result(&mut state, true, GuardStatus::Closed, T0 + 6);
        assert_eq!(state.status(), GuardStatus::Closed);
    }

    #[test]
    fn test_success_while_closed_changes_nothing() {
        let mut state = GuardState::new(config(), T0);
        assert_eq!(process_result(&mut state, false, GuardStatus::Closed, T0), None);
        assert_eq!(state.failures_in_window(T0), 0);
    }

    #[test]
    fn test_open_rejects_until_timeout() {
        let mut state = open_state();

        for elapsed in [0, 30, 60] {
            let admission = admit(&mut state, T0 + elapsed);
            assert!(!admission.admitted);
            assert_eq!(admission.status_at_call_time, GuardStatus::Open);
        }
        assert_eq!(state.probe_calls(), 0);
    }

    #[test]
    fn test_timed_out_open_admits_single_probe() {
        let mut state = open_state();

        let first = admit(&mut state, T0 + 61);
        assert!(first.admitted);
        assert_eq!(first.status_at_call_time, GuardStatus::HalfOpen);
        assert_eq!(first.transition, Some(Transition::new(GuardStatus::Open, GuardStatus::HalfOpen)));
        assert_eq!(state.probe_calls(), 1);

        let second = admit(&mut state, T0 + 61);
        assert!(!second.admitted);
        assert_eq!(second.status_at_call_time, GuardStatus::HalfOpen);
        assert_eq!(state.probe_calls(), 1);
    }

    #[test]
    fn test_half_open_with_free_slot_admits() {
        let mut state = GuardState::new(config(), T0);
        state.set_status(GuardStatus::HalfOpen, T0);

        assert!(admit(&mut state, T0).admitted);
        assert!(!admit(&mut state, T0).admitted);
    }

    #[test]
    fn test_probe_success_closes_and_resets() {
        let mut state = open_state();
        admit(&mut state, T0 + 61);

        let transition = process_result(&mut state, false, GuardStatus::HalfOpen, T0 + 62);
        assert_eq!(transition, Some(Transition::new(GuardStatus::HalfOpen, GuardStatus::Closed)));
        assert_eq!(state.probe_calls(), 0);
    }

    #[test]
    fn test_probe_failure_reopens() {
        let mut state = open_state();
        admit(&mut state, T0 + 61);

        let transition = process_result(&mut state, true, GuardStatus::HalfOpen, T0 + 62);
        assert_eq!(transition, Some(Transition::new(GuardStatus::HalfOpen, GuardStatus::Open)));
        assert_eq!(state.last_transition_secs(), T0 + 62);

        // a fresh cooldown applies before the next probe
        assert!(!admit(&mut state, T0 + 100).admitted);
        assert!(admit(&mut state, T0 + 123).admitted);
    }

    #[test]
    fn test_late_closed_failure_over_threshold_reopens_half_open() {
        let mut state = open_state();
        admit(&mut state, T0 + 61);

        // two stragglers from the closed era stay under the threshold of 3
        assert_eq!(process_result(&mut state, true, GuardStatus::Closed, T0 + 61), None);
        assert_eq!(process_result(&mut state, true, GuardStatus::Closed, T0 + 61), None);
        assert_eq!(state.status(), GuardStatus::HalfOpen);

        let transition = process_result(&mut state, true, GuardStatus::Closed, T0 + 61);
        assert_eq!(transition, Some(Transition::new(GuardStatus::HalfOpen, GuardStatus::Open)));
        assert_eq!(state.status(), GuardStatus::Open);
        assert_eq!(state.last_transition_secs(), T0 + 61);
    }

    #[test]
    fn test_late_closed_failure_keeps_open_cooldown() {
        let mut state = open_state();
        state.record_failure(T0);
        state.record_failure(T0);

        assert_eq!(process_result(&mut state, true, GuardStatus::Closed, T0 + 3), None);
        assert_eq!(state.status(), GuardStatus::Open);
        assert_eq!(state.last_transition_secs(), T0);
    }

    #[test]
    fn test_rejected_open_call_outcome_is_noop_for_status() {
        let mut state = open_state();
        assert_eq!(process_result(&mut state, false, GuardStatus::Open, T0), None);
        assert_eq!(process_result(&mut state, true, GuardStatus::Open, T0), None);
        assert_eq!(state.status(), GuardStatus::Open);
    }
}
