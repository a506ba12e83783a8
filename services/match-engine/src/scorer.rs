//! Pair scoring
//!
//! A score is a cheap, explainable heuristic over the need's `what` text, the
//! offer's name and the need's price ceiling. The engine only depends on the
//! `Scorer` trait so a learned model can be dropped in behind the same call.

use std::collections::BTreeSet;

use chrono::Utc;
use rust_decimal::Decimal;
use types::matching::ProposedMatch;
use types::need::Need;
use types::numeric::{Score, SCORE_DP};
use types::offer::Offer;

/// Scores one need against one offer
///
/// Implementations must be deterministic and side-effect free, and must never
/// return a negative score.
pub trait Scorer: Send + Sync {
    fn score(&self, need: &Need, offer: &Offer) -> Score;
}

/// Tunable bonuses of the heuristic scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Normalized texts are identical
    pub exact_text: Decimal,
    /// One normalized text contains the other
    pub containment: Decimal,
    /// Per whitespace token shared by both texts
    pub per_common_token: Decimal,
    /// Offer price at or below the need's max price
    pub within_budget: Decimal,
    /// Offer price above max price but inside the lenient band
    pub lenient_budget: Decimal,
    /// Lenient band as a multiple of max price
    pub lenient_band: Decimal,
    /// Floor for a zero score that still shares a token
    pub near_miss_floor: Decimal,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_text: Decimal::new(30, 1),
            containment: Decimal::new(15, 1),
            per_common_token: Decimal::new(75, 2),
            within_budget: Decimal::new(15, 1),
            lenient_budget: Decimal::new(5, 1),
            lenient_band: Decimal::new(110, 2),
            near_miss_floor: Decimal::new(1, 1),
        }
    }
}

/// Text similarity plus price fit
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: ScoringWeights,
}

impl HeuristicScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    fn text_component(&self, need_text: &str, offer_text: &str, common_tokens: usize) -> Decimal {
        if need_text == offer_text {
            self.weights.exact_text
        } else if !need_text.is_empty()
            && !offer_text.is_empty()
            && (need_text.contains(offer_text) || offer_text.contains(need_text))
        {
            self.weights.containment
        } else {
            self.weights.per_common_token * Decimal::from(common_tokens)
        }
    }

    /// Price bonus for an offer price against the need's ceiling
    pub fn price_component(&self, max_price: Option<Decimal>, price: Option<Decimal>) -> Decimal {
        let (Some(max_price), Some(price)) = (max_price, price) else {
            return Decimal::ZERO;
        };

        if price <= max_price {
            return self.weights.within_budget;
        }

        // A ceiling too large to widen leaves nothing above it in range
        match max_price.checked_mul(self.weights.lenient_band) {
            Some(ceiling) if price <= ceiling => self.weights.lenient_budget,
            _ => Decimal::ZERO,
        }
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, need: &Need, offer: &Offer) -> Score {
        let need_text = normalize(&need.what);
        let offer_text = normalize(&offer.name);
        let common_tokens = count_common_tokens(&need_text, &offer_text);

        let mut score = self.text_component(&need_text, &offer_text, common_tokens)
            + self.price_component(need.max_price(), offer.price);

        if score.is_zero() && common_tokens > 0 {
            score = self.weights.near_miss_floor;
        }

        score.round_dp(SCORE_DP).max(Decimal::ZERO)
    }
}

/// Score a single pair without creating a stored match
pub fn propose(scorer: &dyn Scorer, need: &Need, offer: &Offer) -> ProposedMatch {
    ProposedMatch {
        need_id: need.id.clone(),
        offer_sku: offer.sku.clone(),
        score: scorer.score(need, offer),
        timestamp: Utc::now(),
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn count_common_tokens(a: &str, b: &str) -> usize {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();
    a_tokens.intersection(&b_tokens).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::ids::{NeedId, Sku};

    fn need(what: &str, max_price: Option<Decimal>) -> Need {
        let need = Need::new(NeedId::try_new("N1").unwrap(), what);
        match max_price {
            Some(p) => need.with_max_price(p),
            None => need,
        }
    }

    fn offer(name: &str, price: Option<Decimal>) -> Offer {
        let offer = Offer::new(Sku::try_new("S1").unwrap(), name);
        match price {
            Some(p) => offer.with_price(p),
            None => offer,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_exact_text_and_budget() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score(
            &need("Breakfast Cereal", Some(dec("5"))),
            &offer("Breakfast Cereal", Some(dec("4.5"))),
        );
        assert_eq!(score, dec("4.5"));
    }

    #[test]
    fn test_normalization_ignores_case_and_padding() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score(&need("  steel PIPE ", None), &offer("Steel Pipe", None));
        assert_eq!(score, dec("3.0"));
    }

    #[test]
    fn test_containment() {
        let scorer = HeuristicScorer::new();
        assert_eq!(scorer.score(&need("Laptop", None), &offer("Gaming Laptop Pro", None)), dec("1.5"));
        assert_eq!(scorer.score(&need("Office Cleaning Service", None), &offer("cleaning", None)), dec("1.5"));
    }

    #[test]
    fn test_token_overlap() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score(
            &need("Consulting Session for Government", None),
            &offer("Consulting Session (1 hour)", None),
        );
        // "consulting" and "session" are shared
        assert_eq!(score, dec("1.50"));
    }

    #[test]
    fn test_unrelated_without_price_is_zero() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score(&need("Road Construction", None), &offer("Laptop", None));
        assert_eq!(score, Decimal::ZERO);
    }

    #[test]
    fn test_price_only_match() {
        let scorer = HeuristicScorer::new();
        let score = scorer.score(&need("Road Construction", Some(dec("100"))), &offer("Laptop", Some(dec("108"))));
        assert_eq!(score, dec("0.5"));
    }

    #[test]
    fn test_price_bands() {
        let scorer = HeuristicScorer::new();
        let max = Some(dec("100"));
        assert_eq!(scorer.price_component(max, Some(dec("100"))), dec("1.5"));
        assert_eq!(scorer.price_component(max, Some(dec("100.01"))), dec("0.5"));
        assert_eq!(scorer.price_component(max, Some(dec("110"))), dec("0.5"));
        assert_eq!(scorer.price_component(max, Some(dec("110.01"))), Decimal::ZERO);
        assert_eq!(scorer.price_component(None, Some(dec("1"))), Decimal::ZERO);
        assert_eq!(scorer.price_component(max, None), Decimal::ZERO);
    }

    #[test]
    fn test_huge_ceiling_does_not_overflow_band() {
        let scorer = HeuristicScorer::new();
        let max = Some(dec("75000000000000000000000000000"));
        assert_eq!(
            scorer.price_component(max, Some(dec("79000000000000000000000000000"))),
            Decimal::ZERO
        );
        assert_eq!(scorer.price_component(max, Some(dec("70000000000000000000000000000"))), dec("1.5"));
        assert_eq!(scorer.price_component(Some(Decimal::MAX), Some(Decimal::MAX)), dec("1.5"));

        let score = scorer.score(
            &need("Gold", Some(dec("75000000000000000000000000000"))),
            &offer("Gold", Some(dec("79000000000000000000000000000"))),
        );
        assert_eq!(score, dec("3.0"));
    }

    #[test]
    fn test_near_miss_floor_with_custom_weights() {
        let scorer = HeuristicScorer::with_weights(ScoringWeights {
            per_common_token: Decimal::ZERO,
            ..ScoringWeights::default()
        });
        let score = scorer.score(&need("Fresh Bread", None), &offer("Bread Knife", None));
        assert_eq!(score, dec("0.1"));
    }

    #[test]
    fn test_negative_weights_never_yield_negative_score() {
        let scorer = HeuristicScorer::with_weights(ScoringWeights {
            exact_text: dec("-2"),
            ..ScoringWeights::default()
        });
        let score = scorer.score(&need("Laptop", None), &offer("Laptop", None));
        assert_eq!(score, Decimal::ZERO);
    }

    #[test]
    fn test_propose_has_no_side_effects() {
        let scorer = HeuristicScorer::new();
        let n = need("Breakfast Cereal", Some(dec("5")));
        let o = offer("Breakfast Cereal", Some(dec("4.5")));
        let proposal = propose(&scorer, &n, &o);
        assert_eq!(proposal.need_id.as_str(), "N1");
        assert_eq!(proposal.offer_sku.as_str(), "S1");
        assert_eq!(proposal.score, dec("4.5"));
    }

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #[test]
        fn prop_identical_text_scores_at_least_exact(text in "[a-zA-Z ]{0,24}", pad in " {0,3}") {
            let scorer = HeuristicScorer::new();
            let padded = format!("{pad}{}{pad}", text.to_uppercase());
            let score = scorer.score(&need(&text, None), &offer(&padded, None));
            prop_assert!(score >= dec("3.0"));
        }

        #[test]
        fn prop_scoring_is_deterministic(
            what in "[a-z ]{0,20}",
            name in "[a-z ]{0,20}",
            max in proptest::option::of(price_strategy()),
            price in proptest::option::of(price_strategy()),
        ) {
            let scorer = HeuristicScorer::new();
            let n = need(&what, max);
            let o = offer(&name, price);
            let first = scorer.score(&n, &o);
            prop_assert_eq!(first, scorer.score(&n, &o));
            prop_assert!(first >= Decimal::ZERO);
        }

        #[test]
        fn prop_price_bonus_bands(max in price_strategy(), price in price_strategy()) {
            let scorer = HeuristicScorer::new();
            // Unrelated single-token texts isolate the price component
            let score = scorer.score(&need("zzz", Some(max)), &offer("qqq", Some(price)));
            let expected = if price <= max {
                dec("1.5")
            } else if price <= max * dec("1.10") {
                dec("0.5")
            } else {
                Decimal::ZERO
            };
            prop_assert_eq!(score, expected);
        }
    }
}
