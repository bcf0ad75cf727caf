//! BBQ services page with catering, masterclass and descaling tabs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::layout::Layout;

/// Sub-panel of the services page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceTab {
    #[default]
    Catering,
    Masterclasses,
    Descaling,
}

impl ServiceTab {
    pub const ALL: [Self; 3] = [Self::Catering, Self::Masterclasses, Self::Descaling];

    /// Tab for a `?tab=` value; unknown or missing values give catering.
    #[must_use]
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("masterclasses") => Self::Masterclasses,
            Some("descaling") => Self::Descaling,
            _ => Self::Catering,
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Catering => "catering",
            Self::Masterclasses => "masterclasses",
            Self::Descaling => "descaling",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Catering => "Catering",
            Self::Masterclasses => "Masterclasses",
            Self::Descaling => "Descaling",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServicesQuery {
    pub tab: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub layout: Layout,
    pub tab: ServiceTab,
    pub tabs: [ServiceTab; 3],
}

#[instrument(skip(layout))]
pub async fn show(Query(query): Query<ServicesQuery>, layout: Layout) -> impl IntoResponse {
    ServicesTemplate {
        layout: layout.page("BBQ Services"),
        tab: ServiceTab::from_query(query.tab.as_deref()),
        tabs: ServiceTab::ALL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tabs() {
        assert_eq!(
            ServiceTab::from_query(Some("masterclasses")),
            ServiceTab::Masterclasses
        );
        assert_eq!(ServiceTab::from_query(Some("Descaling")), ServiceTab::Descaling);
        assert_eq!(ServiceTab::from_query(Some("catering")), ServiceTab::Catering);
    }

    #[test]
    fn test_unknown_tab_falls_back_to_catering() {
        assert_eq!(ServiceTab::from_query(Some("smoking")), ServiceTab::Catering);
        assert_eq!(ServiceTab::from_query(Some("")), ServiceTab::Catering);
        assert_eq!(ServiceTab::from_query(None), ServiceTab::Catering);
    }
}
