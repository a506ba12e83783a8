//! Match Engine Service
//!
//! Periodically pulls the open needs and available offers from their owning
//! collaborators, scores every pair, and for each newly discovered match
//! attempts a best-effort two-step fulfillment (mark the need fulfilled,
//! deliver one unit of the offer).
//!
//! **Key Invariants:**
//! - Fulfillment is attempted at most once per (need, offer) pair for the
//!   lifetime of the engine
//! - The two fulfillment steps are independent; neither is rolled back
//! - Readers of the match store never observe a half-published cycle
//! - No collaborator failure is fatal to a cycle
//!
//! # Architecture
//!
//! ```text
//!  needs collaborator     offers collaborator
//!         │                       │
//!     ┌───▼───────────────────────▼───┐
//!     │        SnapshotFetcher        │  ← keeps last good snapshot
//!     └───────────────┬───────────────┘
//!                     │ needs × offers
//!               ┌─────▼─────┐
//!               │ SeenPairs │  ← skip pairs already processed
//!               └─────┬─────┘
//!                ┌────▼───┐
//!                │ Scorer │
//!                └────┬───┘
//!              ┌──────▼──────┐
//!              │  Fulfiller  │  ← fulfill need, then deliver offer
//!              └──────┬──────┘
//!              ┌──────▼──────┐
//!              │ MatchStore  │  ← atomic swap, read by the gateway
//!              └─────────────┘
//! ```

pub mod collaborator;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod fulfillment;
pub mod scorer;
pub mod snapshot;
pub mod store;
pub mod sync;

pub use collaborator::{CollaboratorError, NeedsDirectory, OfferCatalog};
pub use config::{ConfigError, EmitPolicy, EngineConfig};
pub use engine::{CycleReport, MatchEngine};
pub use scorer::{HeuristicScorer, Scorer, ScoringWeights};
pub use store::{MatchSnapshot, MatchStore};
pub use sync::{LoopState, SyncLoop};

// Service version
pub const SERVICE_VERSION: &str = "0.1.0";
