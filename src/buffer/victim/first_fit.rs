//! First-fit victim selection.
//!
//! The default policy: scan the pool in slot order and take the first
//! unpinned buffer. No recency or frequency weighting; selection is fully
//! determined by which slots are candidates.

use std::collections::BTreeSet;

use crate::common::BufferId;

use super::VictimPolicy;

/// Deterministic lowest-index victim selection.
///
/// Candidates are kept in an ordered set, so `select` is O(log n) and always
/// returns the lowest slot index among unpinned buffers - reproducible across
/// runs with identical pool state.
pub struct FirstFit {
    candidates: BTreeSet<usize>,
}

impl FirstFit {
    /// Create a new first-fit policy.
    pub fn new() -> Self {
        Self {
            candidates: BTreeSet::new(),
        }
    }
}

impl VictimPolicy for FirstFit {
    fn record_access(&mut self, _id: BufferId) {
        // Access order carries no weight in a positional scan.
    }

    fn set_candidate(&mut self, id: BufferId, candidate: bool) {
        if candidate {
            self.candidates.insert(id.0);
        } else {
            self.candidates.remove(&id.0);
        }
    }

    fn select(&mut self) -> Option<BufferId> {
        let lowest = *self.candidates.iter().next()?;
        self.candidates.remove(&lowest);
        Some(BufferId::new(lowest))
    }
}

impl Default for FirstFit {
    fn default() -> Self {
        Self::new()
    }
}
