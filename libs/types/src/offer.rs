//! Supply records
//!
//! Offers are published by merchants to the offers collaborator. Prices may
//! arrive as numbers or numeric strings; anything else is treated as absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::ids::Sku;
use crate::numeric::deserialize_lenient_decimal;

/// A supply record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOffer")]
pub struct Offer {
    pub sku: Sku,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
}

impl Offer {
    pub fn new(sku: Sku, name: impl Into<String>) -> Self {
        Self {
            sku,
            name: name.into(),
            price: None,
            stock: None,
            merchant_id: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: u64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// An offer with a known stock of zero cannot be delivered
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == Some(0)
    }
}

/// Wire shape of an offer before invariants are checked
#[derive(Debug, Deserialize)]
struct RawOffer {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    price: Option<Decimal>,
    #[serde(default, alias = "quantity")]
    stock: Option<u64>,
    #[serde(default)]
    merchant_id: Option<String>,
}

impl TryFrom<RawOffer> for Offer {
    type Error = ModelError;

    fn try_from(raw: RawOffer) -> Result<Self, Self::Error> {
        let sku = raw
            .sku
            .and_then(Sku::try_new)
            .ok_or(ModelError::MissingIdentifier { record: "offer", field: "sku" })?;

        Ok(Self {
            sku,
            name: raw.name.unwrap_or_default(),
            price: raw.price,
            stock: raw.stock,
            merchant_id: raw.merchant_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_offer_from_merchant_payload() {
        let offer: Offer = serde_json::from_value(json!({
            "sku": "steel-pipe",
            "supplier": "steel-pipe",
            "merchant_id": "m-1",
            "merchant_name": "GeneralStore 1a2b",
            "type": "product",
            "name": "Steel Pipe",
            "price": 130.0,
            "quantity": 4
        }))
        .unwrap();

        assert_eq!(offer.sku.as_str(), "steel-pipe");
        assert_eq!(offer.price, Some(Decimal::new(130, 0)));
        assert_eq!(offer.stock, Some(4));
        assert_eq!(offer.merchant_id.as_deref(), Some("m-1"));
    }

    #[test]
    fn test_string_price_is_coerced() {
        let offer: Offer =
            serde_json::from_value(json!({"sku": "S1", "name": "Cereal", "price": "4.50"})).unwrap();
        assert_eq!(offer.price, Some(Decimal::new(450, 2)));
    }

    #[test]
    fn test_garbage_price_is_absent() {
        let offer: Offer =
            serde_json::from_value(json!({"sku": "S1", "name": "Cereal", "price": "ask us"})).unwrap();
        assert_eq!(offer.price, None);
    }

    #[test]
    fn test_offer_without_sku_is_rejected() {
        let result: Result<Offer, _> = serde_json::from_value(json!({"name": "Laptop", "price": 900}));
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_stock() {
        let offer = Offer::new(Sku::try_new("S1").unwrap(), "Cereal").with_stock(0);
        assert!(offer.is_out_of_stock());
        let unknown = Offer::new(Sku::try_new("S2").unwrap(), "Cereal");
        assert!(!unknown.is_out_of_stock());
    }
}
