//! Request and response shapes exchanged with the collaborator services

use serde::{Deserialize, Serialize};

use crate::ids::{NeedId, Sku};
use crate::need::NeedStatus;

/// Parameters of the "list needs" call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NeedStatus>,
}

/// Parameters of the "fulfill need" call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillRequest {
    pub need_id: NeedId,
}

/// Status reported by the needs collaborator after a fulfill call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillStatus {
    Fulfilled,
    NotFound,
    Error,
    /// Any status this engine does not recognise
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillReceipt {
    pub status: FulfillStatus,
}

impl FulfillReceipt {
    pub fn is_success(&self) -> bool {
        self.status == FulfillStatus::Fulfilled
    }
}

/// Parameters of the "deliver offer" call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub sku: Sku,
    pub quantity: u32,
    /// Identifies the caller; the engine tags its own deliveries
    pub merchant_id: String,
}

impl DeliveryRequest {
    /// A single-unit delivery requested by `caller_id`
    pub fn single(sku: Sku, caller_id: impl Into<String>) -> Self {
        Self {
            sku,
            quantity: 1,
            merchant_id: caller_id.into(),
        }
    }
}

/// Status reported by the supply collaborator after a deliver call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    /// Older suppliers confirm with `accepted`
    Accepted,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_stock: Option<u64>,
}

impl DeliveryReceipt {
    pub fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::Delivered | DeliveryStatus::Accepted)
    }
}
