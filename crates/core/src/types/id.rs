//! Product identifiers.
//!
//! The CMS hands out numeric ids for some records and opaque document ids for
//! others, so a product id is either a number or a string. The two forms never
//! compare equal: `1` and `"1"` are different products.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stable product identifier, unique within a cart.
///
/// Serializes in the same shape it was read in (number or string).
///
/// ```
/// use under_the_hood_core::ProductId;
///
/// let numeric: ProductId = "42".parse().unwrap();
/// assert_eq!(numeric, ProductId::Number(42));
///
/// let document: ProductId = "x7k2lq".parse().unwrap();
/// assert_eq!(document, ProductId::Text("x7k2lq".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Numeric database id.
    Number(i64),
    /// Opaque document id.
    Text(String),
}

impl ProductId {
    /// Read an id from an arbitrary JSON value.
    ///
    /// Integers and non-empty strings are accepted; anything else is `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) if !s.trim().is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Error returned when parsing an empty product id.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("product id cannot be empty")]
pub struct EmptyProductId;

impl FromStr for ProductId {
    type Err = EmptyProductId;

    /// Parses form input: integer text becomes [`ProductId::Number`], anything
    /// else non-empty becomes [`ProductId::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyProductId);
        }
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_string()), Self::Number))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self::Number(i64::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}
