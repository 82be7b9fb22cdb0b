// src/search/fingerprint.rs

//! Processor-label-independent identity of a partial schedule.

use std::collections::HashSet;

use blake3::{Hash, Hasher};
use parking_lot::Mutex;

use crate::search::state::SearchState;

/// Canonical digest of a partial schedule.
///
/// Each processor's `(task, start)` sequence is hashed on its own (tasks in
/// id order), the per-processor digests are sorted and then hashed together.
/// Relabelling processors therefore never changes the fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(Hash);

impl Fingerprint {
    pub fn of(state: &SearchState) -> Self {
        let mut lanes: Vec<Hasher> = (0..state.processors()).map(|_| Hasher::new()).collect();

        for (task, placement) in state.assignment().iter().enumerate() {
            if let Some(p) = placement {
                let lane = &mut lanes[p.processor];
                lane.update(&(task as u64).to_le_bytes());
                lane.update(&p.start.to_le_bytes());
            }
        }

        let mut digests: Vec<Hash> = lanes.iter().map(Hasher::finalize).collect();
        digests.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

        let mut hasher = Hasher::new();
        for digest in &digests {
            hasher.update(digest.as_bytes());
        }
        Fingerprint(hasher.finalize())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

/// Fingerprints of every state already expanded during one search.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<Fingerprint>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fingerprint`. Returns `false` when it was already present, in
    /// which case the caller must not expand the state again.
    pub fn insert(&self, fingerprint: Fingerprint) -> bool {
        self.seen.lock().insert(fingerprint)
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.lock().contains(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}
