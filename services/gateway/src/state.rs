use match_engine::{LoopState, MatchStore, Scorer};
use std::sync::Arc;
use tokio::sync::watch;

/// Read-side handles shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MatchStore>,
    pub scorer: Arc<dyn Scorer>,
    pub loop_state: watch::Receiver<LoopState>,
}

impl AppState {
    pub fn new(
        store: Arc<MatchStore>,
        scorer: Arc<dyn Scorer>,
        loop_state: watch::Receiver<LoopState>,
    ) -> Self {
        Self {
            store,
            scorer,
            loop_state,
        }
    }

    pub fn loop_state(&self) -> LoopState {
        *self.loop_state.borrow()
    }
}
