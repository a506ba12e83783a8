//! Snapshot fetcher
//!
//! Pulls the full needs and offers lists once per cycle. A failed or
//! malformed response keeps the last good snapshot; a valid empty list
//! replaces it.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use types::need::{Need, NeedStatus};
use types::offer::Offer;

use crate::collaborator::{with_timeout, NeedsDirectory, OfferCatalog};

/// Where a cycle's snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Fetched this cycle
    Fresh,
    /// Fetch failed; the previous snapshot was kept
    Retained,
}

/// A list snapshot plus its provenance
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Arc<Vec<T>>,
    pub freshness: Freshness,
}

impl<T> Snapshot<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct SnapshotFetcher {
    needs: Arc<dyn NeedsDirectory>,
    offers: Arc<dyn OfferCatalog>,
    call_timeout: Duration,
    last_needs: Arc<Vec<Need>>,
    last_offers: Arc<Vec<Offer>>,
}

impl SnapshotFetcher {
    pub fn new(needs: Arc<dyn NeedsDirectory>, offers: Arc<dyn OfferCatalog>, call_timeout: Duration) -> Self {
        Self {
            needs,
            offers,
            call_timeout,
            last_needs: Arc::new(Vec::new()),
            last_offers: Arc::new(Vec::new()),
        }
    }

    /// Fetch open needs, falling back to the last good snapshot
    pub async fn fetch_needs(&mut self) -> Snapshot<Need> {
        let call = self.needs.list_needs(Some(NeedStatus::Open));
        match with_timeout("need_list", self.call_timeout, call).await {
            Ok(mut needs) => {
                let before = needs.len();
                // The filter is advisory; some collaborators return everything
                needs.retain(Need::is_open);
                if needs.len() < before {
                    debug!(dropped = before - needs.len(), "ignoring needs that are not open");
                }
                self.last_needs = Arc::new(needs);
                Snapshot {
                    items: Arc::clone(&self.last_needs),
                    freshness: Freshness::Fresh,
                }
            }
            Err(e) => {
                warn!(error = %e, retained = self.last_needs.len(), "need list failed, keeping previous snapshot");
                Snapshot {
                    items: Arc::clone(&self.last_needs),
                    freshness: Freshness::Retained,
                }
            }
        }
    }

    /// Fetch available offers, falling back to the last good snapshot
    pub async fn fetch_offers(&mut self) -> Snapshot<Offer> {
        let call = self.offers.list_offers();
        match with_timeout("offer_list", self.call_timeout, call).await {
            Ok(offers) => {
                self.last_offers = Arc::new(offers);
                Snapshot {
                    items: Arc::clone(&self.last_offers),
                    freshness: Freshness::Fresh,
                }
            }
            Err(e) => {
                warn!(error = %e, retained = self.last_offers.len(), "offer list failed, keeping previous snapshot");
                Snapshot {
                    items: Arc::clone(&self.last_offers),
                    freshness: Freshness::Retained,
                }
            }
        }
    }
}
