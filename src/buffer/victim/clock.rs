//! Clock (second-chance) victim selection.
//!
//! Drop-in alternative to [`FirstFit`](super::FirstFit) for workloads where
//! victim quality matters: recently accessed buffers get a second chance
//! before being reassigned.

use crate::common::BufferId;

use super::VictimPolicy;

#[derive(Clone, Copy, Default)]
struct ClockSlot {
    candidate: bool,
    referenced: bool,
}

/// Second-chance victim selection over a fixed slot count.
///
/// A hand sweeps the slot array; a candidate with its reference bit set is
/// spared once (bit cleared), a candidate with the bit clear is selected.
/// Two full sweeps visit every candidate at least twice, so `select` returns
/// `None` only when no candidate exists.
pub struct ClockSweep {
    slots: Vec<ClockSlot>,
    hand: usize,
}

impl ClockSweep {
    /// Create a clock policy for a pool of `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![ClockSlot::default(); capacity],
            hand: 0,
        }
    }
}

impl VictimPolicy for ClockSweep {
    fn record_access(&mut self, id: BufferId) {
        self.slots[id.0].referenced = true;
    }

    fn set_candidate(&mut self, id: BufferId, candidate: bool) {
        self.slots[id.0].candidate = candidate;
    }

    fn select(&mut self) -> Option<BufferId> {
        for _ in 0..self.slots.len() * 2 {
            let at = self.hand;
            self.hand = (self.hand + 1) % self.slots.len();

            let slot = &mut self.slots[at];
            if !slot.candidate {
                continue;
            }
            if slot.referenced {
                slot.referenced = false;
                continue;
            }

            slot.candidate = false;
            return Some(BufferId::new(at));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_basic_sweep() {
        let mut policy = ClockSweep::new(3);

        for i in 0..3 {
            policy.set_candidate(BufferId::new(i), true);
        }

        // No reference bits set: plain sweep order
        assert_eq!(policy.select(), Some(BufferId::new(0)));
        assert_eq!(policy.select(), Some(BufferId::new(1)));
        assert_eq!(policy.select(), Some(BufferId::new(2)));
        assert_eq!(policy.select(), None);
    }

    #[test]
    fn test_clock_second_chance() {
        let mut policy = ClockSweep::new(3);

        for i in 0..3 {
            policy.set_candidate(BufferId::new(i), true);
        }
        policy.record_access(BufferId::new(0));

        // Slot 0 is spared once; slot 1 goes first
        assert_eq!(policy.select(), Some(BufferId::new(1)));
    }

    #[test]
    fn test_clock_all_referenced_still_selects() {
        let mut policy = ClockSweep::new(4);

        for i in 0..4 {
            policy.set_candidate(BufferId::new(i), true);
            policy.record_access(BufferId::new(i));
        }

        // First sweep clears bits, second sweep selects
        assert_eq!(policy.select(), Some(BufferId::new(0)));
    }

    #[test]
    fn test_clock_skips_pinned() {
        let mut policy = ClockSweep::new(3);

        policy.set_candidate(BufferId::new(1), true);

        assert_eq!(policy.select(), Some(BufferId::new(1)));
        assert_eq!(policy.select(), None);
    }
}
