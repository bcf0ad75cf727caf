//! Product and category conversion functions.

use serde_json::Value;
use under_the_hood_core::{Price, ProductId};

use super::media::{best_media_url, first_image_url};
use super::{category_name, decimal, entries, field, record, text, text_any};
use crate::cms::types::{Category, Nutrition, Product};

/// Normalise one product entry.
///
/// `id` falls back to `documentId`; `image` is the first of `images`, else
/// the `art` media.
#[must_use]
pub fn normalize_product(node: &Value, base_url: &str) -> Product {
    let a = record(node);
    let id = ProductId::from_json(field(node, "id"))
        .or_else(|| ProductId::from_json(field(node, "documentId")));

    let image = first_image_url(field(a, "images"), base_url)
        .or_else(|| best_media_url(field(a, "art"), base_url));

    Product {
        id,
        title: text(a, "title"),
        sub_title: text_any(a, &["subTitle", "subtitle"]),
        slug: text(a, "slug"),
        description: text(a, "description"),
        price: Price::from_json(field(a, "price")),
        image,
        category: category_name(a),
        ingredients: text(a, "ingredients"),
        nutrition: normalize_nutrition(field(a, "nutrition")),
        colour: text(a, "colour"),
    }
}

/// Normalise the repeatable nutrition component; anything but a list is empty.
#[must_use]
pub fn normalize_nutrition(value: &Value) -> Vec<Nutrition> {
    let Value::Array(panels) = value else {
        return Vec::new();
    };

    panels
        .iter()
        .map(|n| Nutrition {
            serving_per_packet: decimal(field(n, "servingPerPacket")),
            serving_size: text(n, "servingSize"),
            energy: decimal(field(n, "energy")),
            protein: decimal(field(n, "protein")),
            fat: decimal(field(n, "fat")),
            saturated: decimal(field(n, "saturated")),
            carbs: decimal(field(n, "carbs")),
            sugars: decimal(field(n, "sugars")),
            sodiums: decimal(field(n, "sodiums")),
            notes: text(n, "notes"),
        })
        .collect()
}

/// Products from a list response (`{data: [...]}` or a bare array).
#[must_use]
pub fn extract_products(response: &Value, base_url: &str) -> Vec<Product> {
    entries(response)
        .iter()
        .filter(|node| node.is_object())
        .map(|node| normalize_product(node, base_url))
        .collect()
}

/// Categories from a list response.
#[must_use]
pub fn extract_categories(response: &Value) -> Vec<Category> {
    entries(response)
        .iter()
        .filter(|node| node.is_object())
        .map(|node| {
            let a = record(node);
            Category {
                id: ProductId::from_json(field(node, "id"))
                    .or_else(|| ProductId::from_json(field(node, "documentId"))),
                name: text(a, "name"),
                slug: text(a, "slug"),
            }
        })
        .collect()
}
