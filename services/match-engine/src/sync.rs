//! Sync loop
//!
//! Drives the engine on a fixed interval. Two states: `Idle` while sleeping
//! and `Syncing` while a cycle runs. A cycle always returns the loop to
//! `Idle`, whatever its individual steps did. The loop only ends when its
//! cancellation token fires.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::engine::{CycleReport, MatchEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    Idle,
    Syncing,
}

pub struct SyncLoop {
    engine: MatchEngine,
    interval: Duration,
    cancel: CancellationToken,
    state: watch::Sender<LoopState>,
}

impl SyncLoop {
    /// Wrap an engine; the interval comes from the engine's config
    pub fn new(engine: MatchEngine, cancel: CancellationToken) -> Self {
        let interval = engine.config().sync_interval;
        let (state, _) = watch::channel(LoopState::Idle);
        Self {
            engine,
            interval,
            cancel,
            state,
        }
    }

    /// Observe Idle/Syncing transitions
    pub fn subscribe(&self) -> watch::Receiver<LoopState> {
        self.state.subscribe()
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Run one cycle with the state transitions around it
    pub async fn tick(&mut self) -> CycleReport {
        self.state.send_replace(LoopState::Syncing);
        let report = self.engine.run_cycle(&self.cancel).await;
        self.state.send_replace(LoopState::Idle);
        report
    }

    /// Run until cancelled. The first cycle starts immediately.
    pub async fn run(mut self) -> MatchEngine {
        info!(interval_secs = self.interval.as_secs(), "sync loop started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            self.tick().await;

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(cycles = self.engine.store().cycle(), "sync loop stopped");
        self.engine
    }

    pub fn spawn(self) -> JoinHandle<MatchEngine> {
        tokio::spawn(self.run())
    }
}
