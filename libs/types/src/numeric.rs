//! Fixed-point decimal helpers for prices and scores
//!
//! Collaborators send prices as JSON numbers or numeric strings. Both are
//! coerced into `Decimal` so that price bands and score rounding are exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Compatibility score of a need/offer pair (2 decimal places, never negative)
pub type Score = Decimal;

/// Number of decimal places scores are rounded to
pub const SCORE_DP: u32 = 2;

/// Parse a decimal from free text, accepting plain and scientific notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Coerce a JSON scalar into a decimal.
///
/// Numbers and numeric strings convert; everything else yields None.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// Serde helper: optional decimal that tolerates strings and garbage.
///
/// Unparseable values deserialize as None rather than failing the record.
pub fn deserialize_lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_number() {
        assert_eq!(decimal_from_json(&json!(4.5)), Some(Decimal::new(45, 1)));
        assert_eq!(decimal_from_json(&json!(5)), Some(Decimal::new(5, 0)));
    }

    #[test]
    fn test_decimal_from_numeric_string() {
        assert_eq!(decimal_from_json(&json!(" 100.25 ")), Some(Decimal::new(10025, 2)));
        assert_eq!(decimal_from_json(&json!("1e2")), Some(Decimal::new(100, 0)));
    }

    #[test]
    fn test_non_numeric_values_are_absent() {
        assert_eq!(decimal_from_json(&json!("cheap")), None);
        assert_eq!(decimal_from_json(&json!("")), None);
        assert_eq!(decimal_from_json(&json!(null)), None);
        assert_eq!(decimal_from_json(&json!([5])), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
    }
}
