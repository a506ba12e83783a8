use crate::error::AppError;
use crate::models::{MatchListResponse, ProposeRequest};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use match_engine::scorer::propose;
use types::matching::ProposedMatch;

/// Matches published by the most recent cycle
pub async fn list_matches(State(state): State<AppState>) -> Json<MatchListResponse> {
    let snapshot = state.store.snapshot();
    Json(MatchListResponse::from(snapshot.as_ref()))
}

/// Score a need/offer pair without touching the store or the collaborators
pub async fn propose_match(
    State(state): State<AppState>,
    payload: Result<Json<ProposeRequest>, JsonRejection>,
) -> Result<Json<ProposedMatch>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let proposal = propose(state.scorer.as_ref(), &request.need, &request.offer);
    tracing::debug!(
        need_id = %proposal.need_id,
        sku = %proposal.offer_sku,
        score = %proposal.score,
        "proposed match"
    );

    Ok(Json(proposal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{empty_state, state_with_one_match};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn request(body: serde_json::Value) -> ProposeRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_list_returns_published_matches() {
        let Json(body) = list_matches(State(state_with_one_match())).await;
        assert_eq!(body.cycle, 1);
        assert_eq!(body.count, 1);
        assert_eq!(body.matches[0].need_id.as_str(), "N1");
        assert!(body.matches[0].fulfillment_successful);
        assert!(!body.matches[0].delivery_successful);

        let wire = serde_json::to_value(&body).unwrap();
        assert_eq!(wire["matches"][0]["score"], json!(4.5));
    }

    #[tokio::test]
    async fn test_list_is_empty_before_first_cycle() {
        let Json(body) = list_matches(State(empty_state())).await;
        assert_eq!(body.count, 0);
        assert!(body.published_at.is_none());
    }

    #[tokio::test]
    async fn test_propose_scores_pair() {
        let state = state_with_one_match();
        let req = request(json!({
            "need": {"id": "N9", "what": "Laptop", "elements": {
                "max_price": {"alternatives": ["1000"], "must": true}
            }},
            "offer": {"sku": "S9", "name": "laptop", "price": 950}
        }));

        let Json(proposal) = propose_match(State(state.clone()), Ok(Json(req))).await.unwrap();

        assert_eq!(proposal.need_id.as_str(), "N9");
        assert_eq!(proposal.offer_sku.as_str(), "S9");
        assert_eq!(proposal.score, Decimal::new(450, 2));
        // Proposals are never stored
        assert_eq!(state.store.matches().len(), 1);
    }

    #[tokio::test]
    async fn test_propose_unrelated_pair_scores_zero() {
        let req = request(json!({
            "need": {"id": "N1", "what": "Laptop"},
            "offer": {"sku": "S1", "name": "Garden hose"}
        }));

        let Json(proposal) = propose_match(State(empty_state()), Ok(Json(req))).await.unwrap();
        assert_eq!(proposal.score, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_propose_with_extreme_prices_scores_text_only() {
        let req = request(json!({
            "need": {"id": "N1", "what": "Gold", "elements": {
                "max_price": {"alternatives": ["75000000000000000000000000000"], "must": true}
            }},
            "offer": {"sku": "S1", "name": "Gold", "price": "79000000000000000000000000000"}
        }));

        let Json(proposal) = propose_match(State(empty_state()), Ok(Json(req))).await.unwrap();
        assert_eq!(proposal.score, Decimal::new(3, 0));
    }

    #[test]
    fn test_propose_rejects_need_without_id() {
        let parsed = serde_json::from_value::<ProposeRequest>(json!({
            "need": {"what": "Laptop"},
            "offer": {"sku": "S1", "name": "Laptop"}
        }));
        assert!(parsed.is_err());
    }
}
