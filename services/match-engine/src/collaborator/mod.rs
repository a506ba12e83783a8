//! Collaborator contracts
//!
//! The engine reaches the services that own needs and offers only through
//! these two traits. The JSON-RPC implementation lives in [`rpc`]; tests plug
//! in in-memory fakes.

pub mod rpc;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use types::collaborator::{DeliveryReceipt, DeliveryRequest, FulfillReceipt};
use types::errors::ModelError;
use types::ids::NeedId;
use types::need::{Need, NeedStatus};
use types::offer::Offer;

pub use rpc::{JsonRpcClient, RpcNeedsDirectory, RpcOfferCatalog};

/// Errors raised while talking to a collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("remote error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Owner of the needs
#[async_trait]
pub trait NeedsDirectory: Send + Sync {
    /// List needs, optionally restricted to one status
    async fn list_needs(&self, status: Option<NeedStatus>) -> Result<Vec<Need>, CollaboratorError>;

    /// Mark a need as satisfied
    async fn fulfill_need(&self, need_id: &NeedId) -> Result<FulfillReceipt, CollaboratorError>;
}

/// Owner of the offers and their stock
#[async_trait]
pub trait OfferCatalog: Send + Sync {
    async fn list_offers(&self) -> Result<Vec<Offer>, CollaboratorError>;

    /// Deduct stock for an offer
    async fn deliver_offer(&self, request: &DeliveryRequest) -> Result<DeliveryReceipt, CollaboratorError>;
}

/// Bound a remote call by `after`; expiry is reported as a timeout error.
pub async fn with_timeout<T, F>(
    operation: &'static str,
    after: Duration,
    call: F,
) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout { operation, after }),
    }
}

/// Decode a list payload entry by entry.
///
/// The payload must be an array. Entries that violate the record's
/// invariants are dropped with a warning; the rest are returned.
pub fn decode_list<T: DeserializeOwned>(record: &'static str, payload: Value) -> Result<Vec<T>, CollaboratorError> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            return Err(CollaboratorError::Malformed(format!(
                "expected a list of {record} records, got {}",
                json_kind(&other)
            )))
        }
    };

    let total = entries.len();
    let mut items = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<T>(entry) {
            Ok(item) => items.push(item),
            Err(e) => {
                let err = ModelError::Invalid { record, reason: e.to_string() };
                warn!(record, index, error = %err, "skipping invalid record");
            }
        }
    }

    if total > 0 && items.is_empty() {
        return Err(CollaboratorError::Malformed(format!(
            "none of the {total} {record} records were valid"
        )));
    }
    if items.len() < total {
        warn!(record, kept = items.len(), total, "dropped invalid records from list");
    }
    Ok(items)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
