//! Home page singleton and featured product conversions.

use serde_json::Value;
use under_the_hood_core::ProductId;

use super::media::best_media_url;
use super::{as_text, category_name, field, flag, record, text, text_any, unwrap_data};
use crate::cms::types::{
    DEFAULT_FEATURE_COLOUR, Diet, FeaturedProduct, HomeContent, LinkItem, NavSection,
    SelectedProduct,
};

/// The `navSection` component of the home singleton, in either shape.
fn nav_section(response: &Value) -> &Value {
    let data = field(response, "data");
    let flat = field(data, "navSection");
    if flat.is_null() {
        field(field(data, "attributes"), "navSection")
    } else {
        flat
    }
}

/// Ribbon items under `key`, also accepting the all-lowercase spelling.
fn link_items(section: &Value, key: &str) -> Vec<LinkItem> {
    let lower = key.to_lowercase();
    let raw = [field(section, key), field(section, &lower), field(field(section, key), "data")]
        .into_iter()
        .find_map(Value::as_array);

    raw.map(|items| items.iter().filter_map(pluck_item).collect())
        .unwrap_or_default()
}

fn pluck_item(item: &Value) -> Option<LinkItem> {
    let a = record(unwrap_data(item));
    let label = text(a, "label").trim().to_string();
    if label.is_empty() {
        return None;
    }
    Some(LinkItem {
        label,
        href: Some(text(a, "url")).filter(|u| !u.is_empty()),
    })
}

/// Left/right ribbons and centre image.
#[must_use]
pub fn extract_nav_section(response: &Value, base_url: &str) -> NavSection {
    let section = nav_section(response);
    NavSection {
        left: link_items(section, "leftItems"),
        right: link_items(section, "rightItems"),
        center_image: best_media_url(field(section, "image"), base_url),
    }
}

/// The product picked for the home feature.
///
/// The relation may arrive as `{id, documentId}`, `{data: {id, documentId}}`
/// or a bare numeric id.
#[must_use]
pub fn extract_selected_product(response: &Value) -> SelectedProduct {
    let product = field(nav_section(response), "product");
    if product.is_number() {
        return SelectedProduct {
            id: ProductId::from_json(product),
            document_id: None,
        };
    }

    let inner = unwrap_data(product);
    let pick = |key: &str| {
        let direct = field(product, key);
        if direct.is_null() { field(inner, key) } else { direct }
    };

    SelectedProduct {
        id: ProductId::from_json(pick("id")),
        document_id: as_text(pick("documentId")).filter(|s| !s.is_empty()),
    }
}

#[must_use]
pub fn extract_home(response: &Value, base_url: &str) -> HomeContent {
    HomeContent {
        nav: extract_nav_section(response, base_url),
        selected: extract_selected_product(response),
    }
}

/// Normalise the featured product entry.
#[must_use]
pub fn extract_featured_product(node: &Value, base_url: &str) -> FeaturedProduct {
    let a = record(node);
    let colour = text(a, "colour");

    FeaturedProduct {
        title: text(a, "title"),
        sub_title: text_any(a, &["subTitle", "subtitle"]),
        slug: text(a, "slug"),
        colour: if colour.is_empty() {
            DEFAULT_FEATURE_COLOUR.to_string()
        } else {
            colour
        },
        category: category_name(a),
        diet: Diet {
            gluten_free: flag(field(a, "glutenFree")),
            dairy_free: flag(field(a, "dairyFree")),
            sugar_free: flag(field(a, "sugarFree")),
            vegan_friendly: flag(field(a, "veganFriendly")),
        },
        art: best_media_url(field(a, "art"), base_url),
    }
}
