//! Shop listing and product detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::{instrument, warn};

use crate::cms::{Nutrition, NutritionRow, Product};
use crate::error::{AppError, Result};
use crate::filters;
use crate::layout::Layout;
use crate::state::AppState;

/// Meta panel background when a product has no usable colour.
pub const DEFAULT_META_BG: &str = "#181617";

/// Background and readable foreground for a product's accent panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaColors {
    pub bg: String,
    pub fg: &'static str,
}

/// Pick panel colours for a CMS colour value.
///
/// Hex colours get a foreground chosen by YIQ brightness (`>= 150` is light
/// enough for dark text). Plain colour names are kept with light text.
/// Anything else falls back to [`DEFAULT_META_BG`].
#[must_use]
pub fn meta_colors(colour: &str) -> MetaColors {
    let colour = colour.trim();

    if let Some(hex) = colour.strip_prefix('#') {
        return expand_hex(hex).map_or_else(MetaColors::fallback, |(r, g, b)| {
            let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
            MetaColors {
                bg: colour.to_string(),
                fg: if yiq >= 150 { "#111" } else { "#fff" },
            }
        });
    }

    if !colour.is_empty() && colour.chars().all(|c| c.is_ascii_alphabetic()) {
        return MetaColors {
            bg: colour.to_string(),
            fg: "#fff",
        };
    }

    MetaColors::fallback()
}

impl MetaColors {
    fn fallback() -> Self {
        Self {
            bg: DEFAULT_META_BG.to_string(),
            fg: "#fff",
        }
    }
}

/// `rgb` or `rrggbb` to channel bytes.
fn expand_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let full: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |at: usize| full.get(at..at + 2).and_then(|s| u8::from_str_radix(s, 16).ok());
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A product card in the listing.
#[derive(Clone)]
pub struct ProductCard {
    pub product: Product,
    pub price: Option<String>,
    pub colors: MetaColors,
}

impl From<Product> for ProductCard {
    fn from(product: Product) -> Self {
        Self {
            price: product.price_display(),
            colors: meta_colors(&product.colour),
            product,
        }
    }
}

/// One nutrition table, ready to render.
#[derive(Clone)]
pub struct NutritionTable {
    pub caption: String,
    pub rows: Vec<NutritionRow>,
    pub notes: String,
}

impl From<&Nutrition> for NutritionTable {
    fn from(n: &Nutrition) -> Self {
        Self {
            caption: n.caption(),
            rows: n.rows(),
            notes: n.notes.clone(),
        }
    }
}

/// Shop listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/show.html")]
pub struct ShopShowTemplate {
    pub layout: Layout,
    pub card: ProductCard,
    pub tilt: &'static str,
    pub nutrition: Vec<NutritionTable>,
}

/// Display the product grid.
///
/// A CMS failure renders an empty shop.
#[instrument(skip(state, layout))]
pub async fn index(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    let products = state.cms().products().await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load products");
        Vec::new()
    });

    ShopIndexTemplate {
        layout: layout.page("Shop"),
        products: products.into_iter().map(ProductCard::from).collect(),
    }
}

/// Display a single product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown slug, including when the CMS
/// can't be reached.
#[instrument(skip(state, layout))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    layout: Layout,
) -> Result<impl IntoResponse> {
    let product = state
        .cms()
        .product_by_slug(&slug)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, slug = %slug, "Failed to load product");
            None
        })
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let title = if product.title.is_empty() {
        "Product".to_string()
    } else {
        product.title.clone()
    };

    Ok(ShopShowTemplate {
        layout: layout.page(&title),
        tilt: product.tilt_class(),
        nutrition: product.nutrition.iter().map(NutritionTable::from).collect(),
        card: ProductCard::from(product),
    })
}
