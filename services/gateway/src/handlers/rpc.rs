//! JSON-RPC endpoint
//!
//! Mirrors the REST routes for peers that speak JSON-RPC to every service:
//! `match_list` returns the published matches, `match_propose` scores a
//! single `{need, offer}` pair.

use crate::models::{
    MatchListResponse, ProposeRequest, RpcRequest, RpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::state::AppState;
use axum::{body::Bytes, extract::State, Json};
use match_engine::scorer::propose;
use serde_json::Value;

pub const METHOD_MATCH_LIST: &str = "match_list";
pub const METHOD_MATCH_PROPOSE: &str = "match_propose";

pub async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Json<RpcResponse> {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return Json(RpcResponse::failure(Value::Null, PARSE_ERROR, e.to_string())),
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(request) => request,
        Err(e) => return Json(RpcResponse::failure(id, INVALID_REQUEST, e.to_string())),
    };
    if request.jsonrpc != "2.0" {
        return Json(RpcResponse::failure(
            request.id,
            INVALID_REQUEST,
            "jsonrpc must be \"2.0\"",
        ));
    }

    tracing::debug!(method = %request.method, "rpc call");
    Json(dispatch(&state, request))
}

fn dispatch(state: &AppState, request: RpcRequest) -> RpcResponse {
    match request.method.as_str() {
        METHOD_MATCH_LIST => {
            let snapshot = state.store.snapshot();
            let listing = MatchListResponse::from(snapshot.as_ref());
            to_response(request.id, &listing.matches)
        }
        METHOD_MATCH_PROPOSE => {
            let params: ProposeRequest = match serde_json::from_value(request.params) {
                Ok(params) => params,
                Err(e) => return RpcResponse::failure(request.id, INVALID_PARAMS, e.to_string()),
            };
            let proposal = propose(state.scorer.as_ref(), &params.need, &params.offer);
            to_response(request.id, &proposal)
        }
        other => RpcResponse::failure(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        ),
    }
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> RpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => RpcResponse::success(id, value),
        Err(e) => RpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
    }
}
