//! Demand records
//!
//! A need describes what a requester is looking for, plus a map of named
//! constraint elements. Needs are owned by the needs collaborator; the engine
//! only ever holds a read-only copy taken during a sync cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::errors::ModelError;
use crate::ids::NeedId;
use crate::numeric::decimal_from_json;

/// Element name carrying the requester's price ceiling
pub const MAX_PRICE_ELEMENT: &str = "max_price";

/// Need status as reported by the needs collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedStatus {
    #[default]
    Open,
    Fulfilled,
}

/// A named constraint of a need
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    /// Acceptable values, most preferred first
    #[serde(default)]
    pub alternatives: Vec<Value>,
    /// `true` for a hard requirement, `false` for a want
    #[serde(default)]
    pub must: bool,
    #[serde(default, alias = "rank", skip_serializing_if = "Option::is_none")]
    pub want_rank: Option<u32>,
}

impl Element {
    pub fn is_want(&self) -> bool {
        !self.must
    }

    /// First alternative, coerced to a decimal when numeric
    pub fn first_decimal(&self) -> Option<Decimal> {
        self.alternatives.first().and_then(decimal_from_json)
    }
}

/// A demand record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNeed")]
pub struct Need {
    pub id: NeedId,
    pub what: String,
    pub elements: BTreeMap<String, Element>,
    pub status: NeedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Need {
    pub fn new(id: NeedId, what: impl Into<String>) -> Self {
        Self {
            id,
            what: what.into(),
            elements: BTreeMap::new(),
            status: NeedStatus::Open,
            created_at: None,
        }
    }

    /// Attach a constraint element (builder style)
    pub fn with_element(mut self, name: impl Into<String>, element: Element) -> Self {
        self.elements.insert(name.into(), element);
        self
    }

    /// Attach a hard price ceiling (builder style)
    pub fn with_max_price(self, max_price: Decimal) -> Self {
        self.with_element(
            MAX_PRICE_ELEMENT,
            Element {
                alternatives: vec![Value::String(max_price.to_string())],
                must: true,
                want_rank: None,
            },
        )
    }

    /// Price ceiling taken from the first `max_price` alternative, if numeric
    pub fn max_price(&self) -> Option<Decimal> {
        self.elements
            .get(MAX_PRICE_ELEMENT)
            .and_then(Element::first_decimal)
    }

    pub fn is_open(&self) -> bool {
        self.status == NeedStatus::Open
    }
}

/// Wire shape of a need before invariants are checked
#[derive(Debug, Deserialize)]
struct RawNeed {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    what: Option<String>,
    #[serde(default)]
    elements: Option<BTreeMap<String, Element>>,
    #[serde(default)]
    status: Option<NeedStatus>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawNeed> for Need {
    type Error = ModelError;

    fn try_from(raw: RawNeed) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .and_then(NeedId::try_new)
            .ok_or(ModelError::MissingIdentifier { record: "need", field: "id" })?;

        Ok(Self {
            id,
            what: raw.what.unwrap_or_default(),
            elements: raw.elements.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            created_at: raw.created_at,
        })
    }
}
