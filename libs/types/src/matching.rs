//! Match records
//!
//! A match associates one need with one offer, carries the score that
//! justified it and records what happened when the engine tried to act on it.
//! The two remote steps are independent: there is no rollback, so each has
//! its own attempted/successful pair of flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, NeedId, PairKey, Sku};
use crate::numeric::Score;

/// Outcome of one remote fulfillment step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Whether the remote call was issued at all
    pub attempted: bool,
    /// Whether the collaborator confirmed the step
    pub successful: bool,
}

impl StepOutcome {
    pub const NOT_ATTEMPTED: Self = Self { attempted: false, successful: false };

    pub fn succeeded() -> Self {
        Self { attempted: true, successful: true }
    }

    pub fn failed() -> Self {
        Self { attempted: true, successful: false }
    }
}

/// Result of the two-step fulfillment of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FulfillmentOutcome {
    pub fulfillment: StepOutcome,
    pub delivery: StepOutcome,
    pub remaining_stock: Option<u64>,
}

/// A scored association between one need and one offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub need_id: NeedId,
    pub offer_sku: Sku,
    #[serde(with = "rust_decimal::serde::float")]
    pub score: Score,
    pub created_at: DateTime<Utc>,
    pub fulfillment_attempted: bool,
    pub fulfillment_successful: bool,
    pub delivery_attempted: bool,
    pub delivery_successful: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<u64>,
}

impl Match {
    /// Build a match from a scored pair and its fulfillment outcome
    pub fn new(
        need_id: NeedId,
        offer_sku: Sku,
        score: Score,
        outcome: FulfillmentOutcome,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MatchId::new(),
            need_id,
            offer_sku,
            score,
            created_at,
            fulfillment_attempted: outcome.fulfillment.attempted,
            fulfillment_successful: outcome.fulfillment.successful,
            delivery_attempted: outcome.delivery.attempted,
            delivery_successful: outcome.delivery.successful,
            remaining_stock: outcome.remaining_stock,
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.need_id.clone(), self.offer_sku.clone())
    }

    /// Both remote steps confirmed
    pub fn is_complete(&self) -> bool {
        self.fulfillment_successful && self.delivery_successful
    }

    /// Exactly one of the two remote steps confirmed
    pub fn is_partial(&self) -> bool {
        self.fulfillment_successful != self.delivery_successful
    }
}

/// A side-effect-free score for a single pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedMatch {
    pub need_id: NeedId,
    pub offer_sku: Sku,
    #[serde(with = "rust_decimal::serde::float")]
    pub score: Score,
    pub timestamp: DateTime<Utc>,
}
