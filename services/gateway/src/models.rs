use chrono::{DateTime, Utc};
use match_engine::{CycleReport, LoopState, MatchSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::matching::Match;
use types::need::Need;
use types::offer::Offer;

#[derive(Debug, Clone, Deserialize)]
pub struct ProposeRequest {
    pub need: Need,
    pub offer: Offer,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchListResponse {
    pub cycle: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub count: usize,
    pub matches: Vec<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
}

impl From<&MatchSnapshot> for MatchListResponse {
    fn from(snapshot: &MatchSnapshot) -> Self {
        Self {
            cycle: snapshot.cycle,
            published_at: snapshot.published_at,
            count: snapshot.matches.len(),
            matches: snapshot.matches.clone(),
            report: snapshot.report.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cycle: u64,
    pub loop_state: LoopState,
}

// JSON-RPC 2.0 envelope

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
    pub id: Value,
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcErrorObject {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}
