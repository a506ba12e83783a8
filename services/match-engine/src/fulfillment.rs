//! Fulfillment orchestrator
//!
//! Acts on a new match with two independent remote calls: mark the need
//! fulfilled, then deliver one unit of the offer. There is no shared commit
//! protocol between the two services, so a failure in one step never undoes
//! the other. Each step's outcome is recorded separately on the match.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use types::collaborator::DeliveryRequest;
use types::matching::{FulfillmentOutcome, StepOutcome};
use types::need::Need;
use types::offer::Offer;

use crate::collaborator::{with_timeout, NeedsDirectory, OfferCatalog};

pub struct Fulfiller {
    needs: Arc<dyn NeedsDirectory>,
    offers: Arc<dyn OfferCatalog>,
    caller_id: String,
    call_timeout: Duration,
    enabled: bool,
}

impl Fulfiller {
    pub fn new(
        needs: Arc<dyn NeedsDirectory>,
        offers: Arc<dyn OfferCatalog>,
        caller_id: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            needs,
            offers,
            caller_id: caller_id.into(),
            call_timeout,
            enabled: true,
        }
    }

    /// Disable remote side effects; outcomes are reported as not attempted
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run both steps for a pair. Never fails; failures land in the outcome.
    pub async fn fulfill(&self, need: &Need, offer: &Offer) -> FulfillmentOutcome {
        if !self.enabled {
            return FulfillmentOutcome::default();
        }

        let fulfillment = self.fulfill_need(need).await;
        let (delivery, remaining_stock) = self.deliver_offer(offer).await;

        if fulfillment.successful != delivery.successful {
            // Expected under best-effort fulfillment; nothing is rolled back
            warn!(
                need_id = %need.id,
                offer_sku = %offer.sku,
                fulfilled = fulfillment.successful,
                delivered = delivery.successful,
                "partial fulfillment"
            );
        }

        FulfillmentOutcome {
            fulfillment,
            delivery,
            remaining_stock,
        }
    }

    async fn fulfill_need(&self, need: &Need) -> StepOutcome {
        let call = self.needs.fulfill_need(&need.id);
        match with_timeout("need_fulfill", self.call_timeout, call).await {
            Ok(receipt) if receipt.is_success() => {
                info!(need_id = %need.id, "need fulfilled");
                StepOutcome::succeeded()
            }
            Ok(receipt) => {
                warn!(need_id = %need.id, status = ?receipt.status, "need fulfillment rejected");
                StepOutcome::failed()
            }
            Err(e) => {
                warn!(need_id = %need.id, error = %e, "need fulfillment failed");
                StepOutcome::failed()
            }
        }
    }

    async fn deliver_offer(&self, offer: &Offer) -> (StepOutcome, Option<u64>) {
        let request = DeliveryRequest::single(offer.sku.clone(), self.caller_id.as_str());
        let call = self.offers.deliver_offer(&request);
        match with_timeout("supply_deliver", self.call_timeout, call).await {
            Ok(receipt) if receipt.is_success() => {
                info!(offer_sku = %offer.sku, remaining_stock = ?receipt.remaining_stock, "offer delivered");
                (StepOutcome::succeeded(), receipt.remaining_stock)
            }
            Ok(receipt) => {
                warn!(offer_sku = %offer.sku, status = ?receipt.status, "offer delivery rejected");
                (StepOutcome::failed(), None)
            }
            Err(e) => {
                warn!(offer_sku = %offer.sku, error = %e, "offer delivery failed");
                (StepOutcome::failed(), None)
            }
        }
    }
}
