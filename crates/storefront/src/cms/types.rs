//! View models produced by the CMS adapters.
//!
//! Every field has a default, so templates never branch on what the CMS
//! happened to send.

use rust_decimal::Decimal;
use under_the_hood_core::{CartLineItem, Price, ProductId};

/// Business name used wherever the CMS has none.
pub const BUSINESS_NAME: &str = "Under The Hood BBQ";

/// Accent colour for the featured product when none is set.
pub const DEFAULT_FEATURE_COLOUR: &str = "#F15921";

/// A product as listed in the shop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Product {
    pub id: Option<ProductId>,
    pub title: String,
    pub sub_title: String,
    pub slug: String,
    pub description: String,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: String,
    pub ingredients: String,
    pub nutrition: Vec<Nutrition>,
    pub colour: String,
}

impl Product {
    /// Snapshot this product as a cart line, or `None` without an id.
    #[must_use]
    pub fn to_line_item(&self) -> Option<CartLineItem> {
        let id = self.id.clone()?;
        let mut item = CartLineItem::new(id, self.title.clone()).with_slug(self.slug.clone());
        item.price = self.price;
        item.image.clone_from(&self.image);
        item.category.clone_from(&self.category);
        item.colour = Some(self.colour.clone()).filter(|c| !c.is_empty());
        Some(item)
    }

    /// Formatted price, e.g. `$14.50`.
    #[must_use]
    pub fn price_display(&self) -> Option<String> {
        self.price.map(|p| p.display())
    }

    /// Image tilt: rubs lean left, sauces lean right.
    #[must_use]
    pub fn tilt_class(&self) -> &'static str {
        let category = self.category.to_lowercase();
        if category.contains("rub") {
            "tilt-left"
        } else if category.contains("sauce") {
            "tilt-right"
        } else {
            ""
        }
    }
}

/// One nutrition panel (repeatable component).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nutrition {
    pub serving_per_packet: Option<Decimal>,
    pub serving_size: String,
    pub energy: Option<Decimal>,
    pub protein: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub saturated: Option<Decimal>,
    pub carbs: Option<Decimal>,
    pub sugars: Option<Decimal>,
    pub sodiums: Option<Decimal>,
    pub notes: String,
}

/// A rendered nutrition table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionRow {
    pub label: &'static str,
    pub value: String,
}

impl Nutrition {
    /// Table rows, skipping values the CMS left empty.
    #[must_use]
    pub fn rows(&self) -> Vec<NutritionRow> {
        [
            ("Energy", self.energy, "kJ"),
            ("Protein", self.protein, "g"),
            ("Fat", self.fat, "g"),
            ("Saturated", self.saturated, "g"),
            ("Carbs", self.carbs, "g"),
            ("Sugars", self.sugars, "g"),
            ("Sodium", self.sodiums, "mg"),
        ]
        .into_iter()
        .filter_map(|(label, value, unit)| {
            value.map(|v| NutritionRow {
                label,
                value: format!("{} {unit}", v.normalize()),
            })
        })
        .collect()
    }

    /// "8 servings per packet · Serving size: 20g", or empty.
    #[must_use]
    pub fn caption(&self) -> String {
        let servings = self
            .serving_per_packet
            .map(|n| format!("{} servings per packet", n.normalize()));
        let size = Some(&self.serving_size)
            .filter(|s| !s.is_empty())
            .map(|s| format!("Serving size: {s}"));

        match (servings, size) {
            (Some(a), Some(b)) => format!("{a} · {b}"),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub id: Option<ProductId>,
    pub name: String,
    pub slug: String,
}

/// Site-wide contact details from the `global` singleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteGlobals {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Default for SiteGlobals {
    fn default() -> Self {
        Self {
            name: BUSINESS_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
        }
    }
}

/// The `global` singleton: contact details plus logo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    pub globals: SiteGlobals,
    pub logo: Option<Logo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    pub url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footer {
    pub icons: FooterIcons,
    pub socials: Vec<SocialLink>,
}

/// Icons shown beside the footer contact lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FooterIcons {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
}

/// A ribbon line in the home nav section. No `href` means plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub label: String,
    pub href: Option<String>,
}

/// Left and right ribbons around a centre image on the home page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavSection {
    pub left: Vec<LinkItem>,
    pub right: Vec<LinkItem>,
    pub center_image: Option<String>,
}

/// Which product the editor picked for the home page feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedProduct {
    pub id: Option<ProductId>,
    pub document_id: Option<String>,
}

/// The `home` singleton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeContent {
    pub nav: NavSection,
    pub selected: SelectedProduct,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diet {
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub sugar_free: bool,
    pub vegan_friendly: bool,
}

impl Diet {
    /// Badge labels for the flags that are set, in display order.
    #[must_use]
    pub fn badges(self) -> Vec<&'static str> {
        [
            (self.gluten_free, "Gluten Free"),
            (self.dairy_free, "Dairy Free"),
            (self.sugar_free, "Sugar Free"),
            (self.vegan_friendly, "Vegan Friendly"),
        ]
        .into_iter()
        .filter_map(|(on, label)| on.then_some(label))
        .collect()
    }
}

/// The "New" product feature on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedProduct {
    pub title: String,
    pub sub_title: String,
    pub slug: String,
    pub colour: String,
    pub category: String,
    pub diet: Diet,
    pub art: Option<String>,
}

impl FeaturedProduct {
    #[must_use]
    pub fn badges(&self) -> Vec<&'static str> {
        self.diet.badges()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_line_item_requires_id() {
        assert!(Product::default().to_line_item().is_none());

        let product = Product {
            id: Some(ProductId::Number(7)),
            title: "Smoky Rub".to_string(),
            slug: "smoky-rub".to_string(),
            price: Price::new(d("14.5")),
            category: "Rubs".to_string(),
            ..Product::default()
        };
        let item = product.to_line_item().unwrap();
        assert_eq!(item.id, ProductId::Number(7));
        assert_eq!(item.slug, "smoky-rub");
        assert_eq!(item.category, "Rubs");
        assert_eq!(item.quantity, 1);
        assert!(item.colour.is_none());
    }

    #[test]
    fn test_tilt_class() {
        let mut product = Product {
            category: "Dry Rubs".to_string(),
            ..Product::default()
        };
        assert_eq!(product.tilt_class(), "tilt-left");
        product.category = "BBQ Sauce".to_string();
        assert_eq!(product.tilt_class(), "tilt-right");
        product.category = "Merch".to_string();
        assert_eq!(product.tilt_class(), "");
    }

    #[test]
    fn test_nutrition_rows_skip_missing() {
        let panel = Nutrition {
            energy: Some(d("1200")),
            fat: Some(d("3.50")),
            sodiums: Some(d("410")),
            ..Nutrition::default()
        };
        let rows = panel.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value, "1200 kJ");
        assert_eq!(rows[1].value, "3.5 g");
        assert_eq!(rows[2].label, "Sodium");
    }

    #[test]
    fn test_nutrition_caption() {
        let mut panel = Nutrition {
            serving_per_packet: Some(d("8")),
            serving_size: "20g".to_string(),
            ..Nutrition::default()
        };
        assert_eq!(panel.caption(), "8 servings per packet · Serving size: 20g");
        panel.serving_per_packet = None;
        assert_eq!(panel.caption(), "Serving size: 20g");
        panel.serving_size.clear();
        assert_eq!(panel.caption(), "");
    }

    #[test]
    fn test_diet_badges_order() {
        let diet = Diet {
            vegan_friendly: true,
            gluten_free: true,
            ..Diet::default()
        };
        assert_eq!(diet.badges(), vec!["Gluten Free", "Vegan Friendly"]);
    }
}
