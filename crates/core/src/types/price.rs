//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are always New Zealand dollars; there is no currency engine.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A non-negative price in NZD.
///
/// Serializes as a plain JSON number so persisted carts stay readable by
/// anything that expects `"price": 12.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount))
    }

    /// Read a price from a JSON number or numeric string.
    ///
    /// Returns `None` for anything non-numeric or negative.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let amount = match value {
            Value::Number(n) => parse_decimal(&n.to_string())?,
            Value::String(s) => parse_decimal(s.trim())?,
            _ => return None,
        };
        Self::new(amount)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `$12.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format_nzd(self.0)
    }
}

/// Format an amount the way `en-NZ` formats NZD: `$1,234.50`.
#[must_use]
pub fn format_nzd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&self.0.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid price: {value}")))
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_json_accepts_numbers_and_numeric_strings() {
        assert_eq!(Price::from_json(&json!(12.5)).unwrap().amount(), d("12.5"));
        assert_eq!(Price::from_json(&json!("3")).unwrap().amount(), d("3"));
        assert_eq!(Price::from_json(&json!(" 4.99 ")).unwrap().amount(), d("4.99"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Price::from_json(&json!("free")).is_none());
        assert!(Price::from_json(&json!(null)).is_none());
        assert!(Price::from_json(&json!({"amount": 1})).is_none());
        assert!(Price::from_json(&json!(-2)).is_none());
        assert!(Price::from_json(&json!("")).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(d("12.5")).unwrap().display(), "$12.50");
        assert_eq!(Price::ZERO.display(), "$0.00");
    }

    #[test]
    fn test_format_nzd_groups_thousands() {
        assert_eq!(format_nzd(d("1234.5")), "$1,234.50");
        assert_eq!(format_nzd(d("1000000")), "$1,000,000.00");
        assert_eq!(format_nzd(d("999.999")), "$1,000.00");
        assert_eq!(format_nzd(d("-5")), "-$5.00");
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(d("3.99")).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "3.99");
        let back: Price = serde_json::from_str("3.99").unwrap();
        assert_eq!(back, price);
    }
}
