//! Shared page chrome: navigation, cart badge, footer.
//!
//! `Layout` is an extractor so every full-page handler gets the same data
//! without repeating the CMS lookups.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::warn;

use crate::cart_session::SessionCart;
use crate::cms::{BUSINESS_NAME, Footer, Logo, SiteGlobals, SiteSettings};
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Primary navigation, in display order.
const NAV: &[(&str, &str)] = &[
    ("Home", "/"),
    ("Shop", "/shop"),
    ("BBQ Services", "/bbqservices"),
    ("Contact", "/contact"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Whether `href` should be highlighted for the current `path`.
///
/// `/` only matches itself; other links also match their sub-pages.
#[must_use]
pub fn is_active(path: &str, href: &str) -> bool {
    if href == "/" {
        return path == "/";
    }
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[must_use]
pub fn nav_links(path: &str) -> Vec<NavLink> {
    NAV.iter()
        .map(|&(label, href)| NavLink {
            label,
            href,
            active: is_active(path, href),
        })
        .collect()
}

/// Data the base template needs on every page.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub nonce: String,
    pub nav: Vec<NavLink>,
    pub cart_active: bool,
    pub cart_count: u32,
    pub globals: SiteGlobals,
    pub logo: Option<Logo>,
    pub footer: Footer,
}

impl Layout {
    /// Set the page `<title>`.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the `<title>` to `"{page} | {business name}"`.
    #[must_use]
    pub fn page(self, page: &str) -> Self {
        let title = format!("{page} | {BUSINESS_NAME}");
        self.titled(title)
    }

    /// Fetch site settings and footer concurrently; failures fall back to
    /// defaults.
    async fn site_chrome(state: &AppState) -> (SiteSettings, Footer) {
        let cms = state.cms();
        let (settings, footer) = tokio::join!(cms.global(), cms.footer());

        let settings = settings.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load site settings");
            SiteSettings::default()
        });
        let footer = footer.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load footer");
            Footer::default()
        });
        (settings, footer)
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CspNonce(nonce) = CspNonce::from_request_parts(parts, state).await?;
        let path = parts.uri.path().to_string();

        let cart_count = match Session::from_request_parts(parts, state).await {
            Ok(session) => SessionCart::open(session).await.cart().count(),
            Err((_, reason)) => {
                warn!(reason, "Session unavailable for cart badge");
                0
            }
        };

        let (settings, footer) = Self::site_chrome(state).await;

        Ok(Self {
            title: settings.globals.name.clone(),
            nonce,
            nav: nav_links(&path),
            cart_active: is_active(&path, "/cart"),
            cart_count,
            globals: settings.globals,
            logo: settings.logo,
            footer,
        })
    }
}
