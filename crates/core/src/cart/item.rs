//! Cart line items and the cart value.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::types::{Price, ProductId};

/// One product entry in the cart.
///
/// Display fields are a snapshot of the product taken when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a line item with quantity 1 and no display metadata.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: None,
            image: None,
            slug: String::new(),
            category: String::new(),
            colour: None,
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Price times quantity; a missing price counts as zero.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price
            .map_or(Decimal::ZERO, |p| p.amount())
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }

    /// Read one persisted entry, tolerating legacy and partial shapes.
    ///
    /// Entries without a usable `id` are rejected. `qty` is accepted as an
    /// alias for `quantity`, and anything that is not a positive integer
    /// becomes 1.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = ProductId::from_json(obj.get("id")?)?;

        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let optional_text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let quantity = obj
            .get("quantity")
            .or_else(|| obj.get("qty"))
            .and_then(Value::as_u64)
            .and_then(|q| u32::try_from(q).ok())
            .filter(|q| *q >= 1)
            .unwrap_or(1);

        Some(Self {
            id,
            title: text("title"),
            price: obj.get("price").and_then(Price::from_json),
            image: optional_text("image"),
            slug: text("slug"),
            category: text("category"),
            colour: optional_text("colour"),
            quantity,
        })
    }
}

/// Ordered list of line items with at most one entry per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Decode a persisted snapshot.
    ///
    /// Malformed JSON, or JSON that is not an array, yields an empty cart.
    /// Duplicate ids are merged by summing their quantities.
    #[must_use]
    pub fn from_snapshot(raw: &str) -> Self {
        let Ok(Value::Array(entries)) = serde_json::from_str::<Value>(raw) else {
            return Self::new();
        };

        let mut cart = Self::new();
        for item in entries.iter().filter_map(CartLineItem::from_json) {
            let qty = item.quantity;
            cart.add(item, qty);
        }
        cart
    }

    /// Encode the full list for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|it| &it.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities, as shown on the navigation badge.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, it| acc.saturating_add(it.quantity))
    }

    /// Sum of `price * quantity` over all lines, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or(Decimal::MAX)
    }

    /// Merge `item` into the cart and return the resulting line.
    ///
    /// An existing line with the same id has its quantity increased by `qty`
    /// and keeps its original snapshot; otherwise `item` is appended with
    /// `quantity = qty`. A `qty` of zero is treated as 1.
    pub(crate) fn add(&mut self, mut item: CartLineItem, qty: u32) -> &CartLineItem {
        let qty = qty.max(1);
        let idx = match self.items.iter().position(|it| it.id == item.id) {
            Some(idx) => {
                let line = &mut self.items[idx];
                line.quantity = line.quantity.saturating_add(qty);
                idx
            }
            None => {
                item.quantity = qty;
                self.items.push(item);
                self.items.len() - 1
            }
        };
        &self.items[idx]
    }

    /// Apply `delta` to a line's quantity, flooring at 1.
    ///
    /// Returns the updated line, or `None` when the id is unknown.
    pub(crate) fn set_quantity(&mut self, id: &ProductId, delta: i64) -> Option<&CartLineItem> {
        let line = self.items.iter_mut().find(|it| &it.id == id)?;
        let next = (i64::from(line.quantity) + delta).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(&*line)
    }

    /// Remove and return the line with `id`, if any.
    pub(crate) fn remove(&mut self, id: &ProductId) -> Option<CartLineItem> {
        let idx = self.items.iter().position(|it| &it.id == id)?;
        Some(self.items.remove(idx))
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_accepts_legacy_qty() {
        let item = CartLineItem::from_json(&json!({
            "id": 4, "title": "Brisket Rub", "price": "14.5", "qty": 3
        }))
        .unwrap();
        assert_eq!(item.id, ProductId::Number(4));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.price.unwrap().display(), "$14.50");
    }

    #[test]
    fn test_from_json_defaults() {
        let item = CartLineItem::from_json(&json!({"id": "abc", "quantity": 0})).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "");
        assert!(item.price.is_none());
        assert!(item.image.is_none());
        assert!(item.colour.is_none());
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let huge = Price::new(Decimal::MAX).unwrap();
        let mut cart = Cart::default();
        cart.add(CartLineItem::new(1, "Whole hog").with_price(huge), u32::MAX);
        cart.add(CartLineItem::new(2, "Another hog").with_price(huge), 1);

        assert_eq!(cart.items()[0].line_total(), Decimal::MAX);
        assert_eq!(cart.subtotal(), Decimal::MAX);
    }

    #[test]
    fn test_from_json_requires_id() {
        assert!(CartLineItem::from_json(&json!({"title": "x"})).is_none());
        assert!(CartLineItem::from_json(&json!({"id": null})).is_none());
        assert!(CartLineItem::from_json(&json!("not an object")).is_none());
    }

    #[test]
    fn test_snapshot_rejects_non_arrays() {
        assert!(Cart::from_snapshot("{not json").is_empty());
        assert!(Cart::from_snapshot("{\"id\": 1}").is_empty());
        assert!(Cart::from_snapshot("").is_empty());
    }

    #[test]
    fn test_snapshot_merges_duplicate_ids() {
        let cart = Cart::from_snapshot(r#"[{"id":1,"qty":2},{"id":2},{"id":1,"quantity":5}]"#);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&ProductId::Number(1)).unwrap().quantity, 7);
        assert_eq!(cart.items()[1].id, ProductId::Number(2));
    }

    #[test]
    fn test_snapshot_skips_bad_entries() {
        let cart = Cart::from_snapshot(r#"[{"title":"no id"},{"id":"ok"},42]"#);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_snapshot_writes_quantity_key() {
        let mut cart = Cart::new();
        cart.add(CartLineItem::new(1, "Hot Sauce"), 2);
        let raw = cart.to_snapshot().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":1,"title":"Hot Sauce","slug":"","category":"","quantity":2}]"#
        );
        assert_eq!(Cart::from_snapshot(&raw), cart);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(CartLineItem::new(1, "Rub"), 0).quantity, 1);
    }

    #[test]
    fn test_add_existing_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add(CartLineItem::new(1, "Original"), 1);
        cart.add(CartLineItem::new(1, "Renamed"), 1);
        let line = cart.get(&ProductId::Number(1)).unwrap();
        assert_eq!(line.title, "Original");
        assert_eq!(line.quantity, 2);
    }
}
