//! Match store
//!
//! Holds the most recently published cycle. Publishing swaps in a complete
//! snapshot in one atomic store, so readers see either the previous cycle or
//! the new one and never wait on a running cycle.

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use types::matching::Match;

use crate::engine::CycleReport;

/// Everything one cycle published
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchSnapshot {
    /// Cycle number that produced this snapshot; 0 before the first publish
    pub cycle: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub matches: Vec<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
}

#[derive(Debug)]
pub struct MatchStore {
    current: ArcSwap<MatchSnapshot>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(MatchSnapshot::default()),
        }
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: MatchSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Latest complete snapshot
    pub fn snapshot(&self) -> Arc<MatchSnapshot> {
        self.current.load_full()
    }

    /// Copy of the latest published matches
    pub fn matches(&self) -> Vec<Match> {
        self.current.load().matches.clone()
    }

    pub fn cycle(&self) -> u64 {
        self.current.load().cycle
    }
}

impl Default for MatchStore {
    fn default() -> Self {
        Self::new()
    }
}
