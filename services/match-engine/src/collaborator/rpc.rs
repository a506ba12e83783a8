//! JSON-RPC 2.0 over HTTP collaborator client
//!
//! The needs worker, the offers board and the supplier all expose their
//! operations as JSON-RPC methods on a single POST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use types::collaborator::{DeliveryReceipt, DeliveryRequest, FulfillReceipt, FulfillRequest, NeedListParams};
use types::ids::NeedId;
use types::need::{Need, NeedStatus};
use types::offer::Offer;
use uuid::Uuid;

use super::{decode_list, CollaboratorError, NeedsDirectory, OfferCatalog};

pub const METHOD_NEED_LIST: &str = "need_list";
pub const METHOD_NEED_FULFILL: &str = "need_fulfill";
pub const METHOD_OFFER_LIST: &str = "offer_list";
pub const METHOD_SUPPLY_DELIVER: &str = "supply_deliver";

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize + ?Sized> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a P,
    id: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Minimal JSON-RPC client bound to one endpoint
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: Client,
    endpoint: String,
}

impl JsonRpcClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Call `method` and return the raw `result` member.
    pub async fn call_value<P>(&self, method: &str, params: &P) -> Result<Value, CollaboratorError>
    where
        P: Serialize + ?Sized,
    {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: Uuid::new_v4().to_string(),
        };
        debug!(endpoint = %self.endpoint, method, id = %request.id, "json-rpc call");

        let res = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("{method}: {e}")))?;

        if !res.status().is_success() {
            return Err(CollaboratorError::Status(res.status().as_u16()));
        }

        let body = res
            .json::<RpcResponse>()
            .await
            .map_err(|e| CollaboratorError::Malformed(format!("{method}: {e}")))?;

        if let Some(error) = body.error {
            return Err(CollaboratorError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| CollaboratorError::Malformed(format!("{method}: response has no result")))
    }

    /// Call `method` and decode the `result` member as `R`.
    pub async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, CollaboratorError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let value = self.call_value(method, params).await?;
        serde_json::from_value(value).map_err(|e| CollaboratorError::Malformed(format!("{method}: {e}")))
    }
}

/// Needs collaborator reached over JSON-RPC
#[derive(Debug, Clone)]
pub struct RpcNeedsDirectory {
    client: JsonRpcClient,
}

impl RpcNeedsDirectory {
    pub fn new(client: JsonRpcClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NeedsDirectory for RpcNeedsDirectory {
    async fn list_needs(&self, status: Option<NeedStatus>) -> Result<Vec<Need>, CollaboratorError> {
        let payload = self
            .client
            .call_value(METHOD_NEED_LIST, &NeedListParams { status })
            .await?;
        decode_list("need", payload)
    }

    async fn fulfill_need(&self, need_id: &NeedId) -> Result<FulfillReceipt, CollaboratorError> {
        let request = FulfillRequest { need_id: need_id.clone() };
        self.client.call(METHOD_NEED_FULFILL, &request).await
    }
}

/// Offers collaborator reached over JSON-RPC
///
/// Listing goes to the offers board, deliveries to the supplier; both may be
/// the same endpoint.
#[derive(Debug, Clone)]
pub struct RpcOfferCatalog {
    offers: JsonRpcClient,
    supply: JsonRpcClient,
}

impl RpcOfferCatalog {
    pub fn new(offers: JsonRpcClient, supply: JsonRpcClient) -> Self {
        Self { offers, supply }
    }
}

#[async_trait]
impl OfferCatalog for RpcOfferCatalog {
    async fn list_offers(&self) -> Result<Vec<Offer>, CollaboratorError> {
        let payload = self.offers.call_value(METHOD_OFFER_LIST, &json!({})).await?;
        decode_list("offer", payload)
    }

    async fn deliver_offer(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt, CollaboratorError> {
        self.supply.call(METHOD_SUPPLY_DELIVER, request).await
    }
}
