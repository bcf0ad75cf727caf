//! Normalisation of raw CMS responses into view models.
//!
//! The CMS has served two record shapes over time:
//!
//! ```text
//! flat:     { "id": 1, "title": "Smoky Rub", "art": { "url": ... } }
//! wrapped:  { "id": 1, "attributes": { "title": "Smoky Rub",
//!                                      "art": { "data": { "attributes": { "url": ... } } } } }
//! ```
//!
//! The helpers here peel both shapes so the entity adapters can read fields
//! without caring which one arrived. None of them panic on absent paths.

mod home;
mod media;
mod products;
mod site;

pub use home::{extract_featured_product, extract_home, extract_nav_section, extract_selected_product};
pub use media::{best_media_url, first_image_url, resolve_media_url};
pub use products::{extract_categories, extract_products, normalize_nutrition, normalize_product};
pub use site::{extract_footer, extract_globals, extract_logo, extract_site_settings};

use rust_decimal::Decimal;
use serde_json::Value;

static NULL: Value = Value::Null;

/// Inner record of a wrapped entry, or the value itself when flat.
pub(crate) fn record(value: &Value) -> &Value {
    match value.get("attributes") {
        Some(attrs) if attrs.is_object() => attrs,
        _ => value,
    }
}

/// Peel a `{ "data": ... }` relation wrapper, if present.
pub(crate) fn unwrap_data(value: &Value) -> &Value {
    value.get("data").unwrap_or(value)
}

/// Entries of a to-many relation: a bare array or `{ "data": [...] }`.
pub(crate) fn entries(value: &Value) -> &[Value] {
    match unwrap_data(value) {
        Value::Array(items) => items,
        _ => &[],
    }
}

/// First record of a list response, if any.
#[must_use]
pub fn first_entry(response: &Value) -> Option<&Value> {
    entries(response).first().filter(|node| node.is_object())
}

/// Field lookup that yields `Null` for missing keys and non-objects.
pub(crate) fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&NULL)
}

/// Text content: strings as-is, numbers as their decimal form, else `None`.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Text under `key`, or an empty string.
pub(crate) fn text(value: &Value, key: &str) -> String {
    as_text(field(value, key)).unwrap_or_default()
}

/// First non-empty text among `keys`.
pub(crate) fn text_any(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| text(value, key))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

/// A number or numeric string.
pub(crate) fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let raw = n.to_string();
            raw.parse()
                .ok()
                .or_else(|| Decimal::from_scientific(&raw).ok())
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthiness of a flag: `true`, non-zero numbers and `"true"` count as set.
pub(crate) fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Name of a to-one `category` relation in either shape.
pub(crate) fn category_name(value: &Value) -> String {
    text(record(unwrap_data(field(value, "category"))), "name")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_unwraps_attributes() {
        let wrapped = json!({"id": 1, "attributes": {"title": "Rub"}});
        assert_eq!(text(record(&wrapped), "title"), "Rub");

        let flat = json!({"id": 1, "title": "Rub"});
        assert_eq!(text(record(&flat), "title"), "Rub");
    }

    #[test]
    fn test_entries_shapes() {
        assert_eq!(entries(&json!([1, 2])).len(), 2);
        assert_eq!(entries(&json!({"data": [1]})).len(), 1);
        assert!(entries(&json!({"data": null})).is_empty());
        assert!(entries(&Value::Null).is_empty());
    }

    #[test]
    fn test_text_helpers() {
        let v = json!({"a": "x", "n": 5, "empty": "", "obj": {}});
        assert_eq!(text(&v, "a"), "x");
        assert_eq!(text(&v, "n"), "5");
        assert_eq!(text(&v, "missing"), "");
        assert_eq!(text(&v, "obj"), "");
        assert_eq!(text_any(&v, &["empty", "a"]), "x");
        assert_eq!(text(&Value::Null, "a"), "");
    }

    #[test]
    fn test_decimal_accepts_numbers_and_strings() {
        assert_eq!(decimal(&json!(12.5)), Some(Decimal::new(125, 1)));
        assert_eq!(decimal(&json!("3")), Some(Decimal::from(3)));
        assert_eq!(decimal(&json!("abc")), None);
        assert_eq!(decimal(&json!(null)), None);
    }

    #[test]
    fn test_flag() {
        assert!(flag(&json!(true)));
        assert!(flag(&json!(1)));
        assert!(!flag(&json!(null)));
        assert!(!flag(&json!("")));
    }

    #[test]
    fn test_category_name_shapes() {
        let v4 = json!({"category": {"data": {"id": 1, "attributes": {"name": "Rubs"}}}});
        let v5 = json!({"category": {"id": 1, "name": "Sauces"}});
        assert_eq!(category_name(&v4), "Rubs");
        assert_eq!(category_name(&v5), "Sauces");
        assert_eq!(category_name(&json!({"category": null})), "");
    }
}
