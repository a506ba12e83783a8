//! Match engine core
//!
//! One sync cycle: fetch snapshots, walk the needs × offers cross product,
//! skip pairs already processed, score the rest, fulfil each new positive
//! match and publish the cycle's matches in one swap.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use types::ids::PairKey;
use types::matching::Match;

use crate::collaborator::{NeedsDirectory, OfferCatalog};
use crate::config::{EmitPolicy, EngineConfig};
use crate::dedup::SeenPairs;
use crate::fulfillment::Fulfiller;
use crate::scorer::{HeuristicScorer, Scorer};
use crate::snapshot::{Freshness, SnapshotFetcher};
use crate::store::{MatchSnapshot, MatchStore};

/// Summary of one sync cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub needs: usize,
    pub offers: usize,
    pub needs_freshness: Freshness,
    pub offers_freshness: Freshness,
    /// Pairs that reached the scorer
    pub pairs_scored: usize,
    pub matches_created: usize,
    /// Earlier matches published again under `EmitPolicy::RetainSeen`
    pub matches_re_emitted: usize,
    pub needs_fulfilled: usize,
    pub offers_delivered: usize,
    /// Stopped early by shutdown; the matches made so far were still published
    pub interrupted: bool,
}

/// Main match engine
pub struct MatchEngine {
    config: EngineConfig,
    scorer: Arc<dyn Scorer>,
    fetcher: SnapshotFetcher,
    seen: Arc<SeenPairs>,
    fulfiller: Fulfiller,
    store: Arc<MatchStore>,
    cycle: u64,
}

impl MatchEngine {
    /// Create an engine with the heuristic scorer built from `config.weights`
    pub fn new(config: EngineConfig, needs: Arc<dyn NeedsDirectory>, offers: Arc<dyn OfferCatalog>) -> Self {
        let fetcher = SnapshotFetcher::new(Arc::clone(&needs), Arc::clone(&offers), config.call_timeout);
        let fulfiller = Fulfiller::new(needs, offers, config.caller_id.clone(), config.call_timeout)
            .with_enabled(config.fulfillment_enabled);

        Self {
            scorer: Arc::new(HeuristicScorer::with_weights(config.weights.clone())),
            fetcher,
            seen: Arc::new(SeenPairs::new()),
            fulfiller,
            store: Arc::new(MatchStore::new()),
            cycle: 0,
            config,
        }
    }

    /// Swap in a different scoring implementation
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Publish into an existing store, e.g. one already shared with readers
    pub fn with_store(mut self, store: Arc<MatchStore>) -> Self {
        self.store = store;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> Arc<dyn Scorer> {
        Arc::clone(&self.scorer)
    }

    pub fn store(&self) -> Arc<MatchStore> {
        Arc::clone(&self.store)
    }

    pub fn seen_pairs(&self) -> Arc<SeenPairs> {
        Arc::clone(&self.seen)
    }

    /// Run one full cycle and publish its matches.
    ///
    /// Cancellation is checked between pairs: the pair in flight finishes
    /// both of its remote calls, later pairs are skipped, and whatever was
    /// created is still published.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> CycleReport {
        self.cycle += 1;
        let cycle = self.cycle;
        let started_at = Utc::now();

        let needs = self.fetcher.fetch_needs().await;
        let offers = self.fetcher.fetch_offers().await;

        let previous = self.store.snapshot();
        let prior_matches: HashMap<PairKey, &Match> = match self.config.emit_policy {
            EmitPolicy::RetainSeen => previous.matches.iter().map(|m| (m.pair_key(), m)).collect(),
            EmitPolicy::NewOnly => HashMap::new(),
        };
        let mut re_emitted: HashSet<PairKey> = HashSet::new();

        let mut matches = Vec::new();
        let mut pairs_scored = 0;
        let mut needs_fulfilled = 0;
        let mut offers_delivered = 0;
        let mut interrupted = false;

        'pairs: for need in needs.items.iter() {
            for offer in offers.items.iter() {
                if cancel.is_cancelled() {
                    interrupted = true;
                    break 'pairs;
                }

                let key = PairKey::new(need.id.clone(), offer.sku.clone());
                if !self.seen.is_new(&key) {
                    if let Some(prior) = prior_matches.get(&key) {
                        if re_emitted.insert(key) {
                            matches.push((*prior).clone());
                        }
                    }
                    continue;
                }

                if offer.is_out_of_stock() {
                    debug!(offer_sku = %offer.sku, "skipping out-of-stock offer");
                    continue;
                }

                let score = self.scorer.score(need, offer);
                pairs_scored += 1;
                debug!(need_id = %need.id, offer_sku = %offer.sku, %score, "scored pair");
                if score <= Decimal::ZERO {
                    continue;
                }

                // Duplicate entries within one snapshot lose the claim
                if !self.seen.claim(key) {
                    continue;
                }

                let outcome = self.fulfiller.fulfill(need, offer).await;
                if outcome.fulfillment.successful {
                    needs_fulfilled += 1;
                }
                if outcome.delivery.successful {
                    offers_delivered += 1;
                }

                let created = Match::new(need.id.clone(), offer.sku.clone(), score, outcome, Utc::now());
                info!(
                    cycle,
                    match_id = %created.id,
                    need_id = %created.need_id,
                    offer_sku = %created.offer_sku,
                    score = %created.score,
                    fulfilled = created.fulfillment_successful,
                    delivered = created.delivery_successful,
                    "match created"
                );
                matches.push(created);
            }
        }

        let matches_re_emitted = re_emitted.len();
        let report = CycleReport {
            cycle,
            started_at,
            finished_at: Utc::now(),
            needs: needs.len(),
            offers: offers.len(),
            needs_freshness: needs.freshness,
            offers_freshness: offers.freshness,
            pairs_scored,
            matches_created: matches.len() - matches_re_emitted,
            matches_re_emitted,
            needs_fulfilled,
            offers_delivered,
            interrupted,
        };

        self.store.publish(MatchSnapshot {
            cycle,
            published_at: Some(report.finished_at),
            matches,
            report: Some(report.clone()),
        });

        info!(
            cycle,
            needs = report.needs,
            offers = report.offers,
            scored = report.pairs_scored,
            created = report.matches_created,
            re_emitted = report.matches_re_emitted,
            fulfilled = report.needs_fulfilled,
            delivered = report.offers_delivered,
            interrupted = report.interrupted,
            "sync cycle complete"
        );

        report
    }
}
