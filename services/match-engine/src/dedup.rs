//! Seen-pair ledger
//!
//! Remembers every (need, offer) pair that has produced a match for the whole
//! lifetime of the engine, so no pair is ever fulfilled twice. Entries are
//! never evicted, even after the match drops out of the published list.

use dashmap::DashSet;
use types::ids::PairKey;

#[derive(Debug, Default)]
pub struct SeenPairs {
    pairs: DashSet<PairKey>,
}

impl SeenPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the pair has never been recorded
    pub fn is_new(&self, key: &PairKey) -> bool {
        !self.pairs.contains(key)
    }

    pub fn record(&self, key: PairKey) {
        self.pairs.insert(key);
    }

    /// Atomically check and record a pair.
    ///
    /// Returns true only for the first caller to claim `key`; any number of
    /// concurrent workers can race on the same pair and exactly one wins.
    pub fn claim(&self, key: PairKey) -> bool {
        self.pairs.insert(key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
