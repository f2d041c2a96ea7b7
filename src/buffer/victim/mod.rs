//! Victim-selection policies.
//!
//! When `pin`/`pin_new` misses and no slot is free, a policy picks which
//! unpinned buffer to reassign. Policies only see slot ids and
//! candidacy/access events; the pin accounting that feeds them lives in the
//! pool.
//!
//! Implemented:
//! - [`FirstFit`] - deterministic lowest-index scan (the default)
//! - [`ClockSweep`] - second-chance scan for workloads that want recency

mod clock;
mod first_fit;

pub use clock::ClockSweep;
pub use first_fit::FirstFit;

use crate::common::BufferId;

/// A victim-selection policy.
///
/// The pool drives the policy under its own lock:
/// - [`record_access`](VictimPolicy::record_access) on every pin of a slot
/// - [`set_candidate`](VictimPolicy::set_candidate) with `true` when a slot's
///   pin count drops to zero, `false` when it leaves zero
/// - [`select`](VictimPolicy::select) on a miss with no free slot
///
/// `select` must only return current candidates, and must remove the returned
/// slot from candidacy (the pool pins it immediately).
pub trait VictimPolicy: Send {
    /// Note that a slot was accessed (pinned or re-pinned).
    fn record_access(&mut self, id: BufferId);

    /// Mark whether a slot is a candidate for selection.
    fn set_candidate(&mut self, id: BufferId, candidate: bool);

    /// Pick an unpinned slot to reassign, or `None` if every slot is pinned.
    fn select(&mut self) -> Option<BufferId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shared contract checks, run against both policies.
    fn check_never_selects_non_candidate(mut policy: Box<dyn VictimPolicy>) {
        policy.set_candidate(BufferId::new(0), false);
        policy.set_candidate(BufferId::new(1), true);
        policy.set_candidate(BufferId::new(2), false);

        assert_eq!(policy.select(), Some(BufferId::new(1)));
        assert_eq!(policy.select(), None);
    }

    fn check_reoffer_after_selection(mut policy: Box<dyn VictimPolicy>) {
        policy.set_candidate(BufferId::new(0), true);
        let picked = policy.select().unwrap();

        // Selection consumes candidacy until the pool re-offers the slot.
        assert_eq!(policy.select(), None);
        policy.set_candidate(picked, true);
        assert_eq!(policy.select(), Some(picked));
    }

    #[test]
    fn test_first_fit_contract() {
        check_never_selects_non_candidate(Box::new(FirstFit::new()));
        check_reoffer_after_selection(Box::new(FirstFit::new()));
    }

    #[test]
    fn test_clock_contract() {
        check_never_selects_non_candidate(Box::new(ClockSweep::new(3)));
        check_reoffer_after_selection(Box::new(ClockSweep::new(3)));
    }
}
