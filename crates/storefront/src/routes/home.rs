//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::{instrument, warn};

use super::shop::{MetaColors, meta_colors};
use crate::cms::{FeaturedProduct, HomeContent, LinkItem};
use crate::filters;
use crate::layout::Layout;
use crate::state::AppState;

/// Left ribbon text when the CMS has none.
pub const LEFT_RIBBON_FALLBACK: &str = "NELSON'S AWARD WINNING";

/// Featured product with its accent panel colours.
#[derive(Clone)]
pub struct FeatureView {
    pub product: FeaturedProduct,
    pub colors: MetaColors,
    pub badges: Vec<&'static str>,
}

impl From<FeaturedProduct> for FeatureView {
    fn from(product: FeaturedProduct) -> Self {
        Self {
            colors: meta_colors(&product.colour),
            badges: product.badges(),
            product,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub left: Vec<LinkItem>,
    pub right: Vec<LinkItem>,
    pub center_image: Option<String>,
    pub feature: Option<FeatureView>,
}

/// Left ribbon items, or the single fallback line.
#[must_use]
pub fn left_ribbon(items: Vec<LinkItem>) -> Vec<LinkItem> {
    if items.is_empty() {
        vec![LinkItem {
            label: LEFT_RIBBON_FALLBACK.to_string(),
            href: None,
        }]
    } else {
        items
    }
}

/// Display the home page.
///
/// The hero is static; ribbons and the featured product come from the CMS
/// and are left out when it can't be reached.
#[instrument(skip(state, layout))]
pub async fn home(State(state): State<AppState>, layout: Layout) -> impl IntoResponse {
    let publication = state.publication_state();
    let content = state.cms().home(publication).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load home content");
        HomeContent::default()
    });

    let featured = state
        .cms()
        .featured_product(&content.selected, publication)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load featured product");
            None
        });

    HomeTemplate {
        layout,
        left: left_ribbon(content.nav.left),
        right: content.nav.right,
        center_image: content.nav.center_image,
        feature: featured.map(FeatureView::from),
    }
}
