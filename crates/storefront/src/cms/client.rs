//! CMS REST client.
//!
//! Uses `reqwest` for HTTP and caches raw JSON responses with `moka`, keyed
//! by path and encoded query, for the configured TTL (60 seconds by default).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument};
use under_the_hood_core::PublicationState;

use super::conversions::{
    extract_categories, extract_featured_product, extract_footer, extract_home, extract_products,
    extract_site_settings, first_entry,
};
use super::types::{Category, FeaturedProduct, Footer, HomeContent, Product, SelectedProduct, SiteSettings};
use super::{CmsError, CmsQuery};
use crate::config::CmsConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PRODUCT_RELATIONS: &[&str] = &["images", "art", "category", "nutrition"];
const PRODUCT_FIELDS: &[&str] = &[
    "title",
    "subTitle",
    "slug",
    "price",
    "description",
    "ingredients",
    "colour",
];
const FEATURED_FIELDS: &[&str] = &[
    "title",
    "subTitle",
    "slug",
    "colour",
    "glutenFree",
    "dairyFree",
    "sugarFree",
    "veganFriendly",
];

/// Client for the CMS REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CmsClient {
    inner: Arc<CmsClientInner>,
}

struct CmsClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    cache: Cache<String, Value>,
}

impl std::fmt::Debug for CmsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl CmsClient {
    /// Create a new CMS client.
    #[must_use]
    pub fn new(config: &CmsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(CmsClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                token: config.token.clone(),
                cache,
            }),
        }
    }

    /// Origin that relative media URLs are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }

    /// `GET {base}/api{path}?{query}` and parse the body as JSON.
    ///
    /// Successful responses are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL is configured, the request fails, the
    /// CMS answers with a non-success status, or the body is not JSON.
    #[instrument(skip(self, query), fields(query = %query.encode()))]
    pub async fn fetch(&self, path: &str, query: &CmsQuery) -> Result<Value, CmsError> {
        if self.inner.base_url.is_empty() {
            return Err(CmsError::NotConfigured);
        }

        let mut url = format!("{}/api{path}", self.inner.base_url);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }

        if let Some(cached) = self.inner.cache.get(&url).await {
            debug!("Cache hit");
            return Ok(cached);
        }

        let mut request = self.inner.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "CMS returned non-success status"
            );
            return Err(CmsError::status(status.as_u16(), &body));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse CMS response");
            CmsError::Parse(e)
        })?;

        self.inner.cache.insert(url, value.clone()).await;
        Ok(value)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All live products, sorted by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CmsError> {
        let query = CmsQuery::new()
            .populate(PRODUCT_RELATIONS)
            .fields(PRODUCT_FIELDS)
            .sort(&["title:asc"])
            .publication_state(PublicationState::Live)
            .page_size(100);

        let response = self.fetch("/products", &query).await?;
        Ok(extract_products(&response, self.base_url()))
    }

    /// A single live product by slug, or `None` if no product matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, CmsError> {
        let query = CmsQuery::new()
            .filter_eq("slug", slug)
            .populate(PRODUCT_RELATIONS)
            .fields(PRODUCT_FIELDS)
            .publication_state(PublicationState::Live)
            .page_size(1);

        let response = self.fetch("/products", &query).await?;
        Ok(extract_products(&response, self.base_url()).into_iter().next())
    }

    /// Product categories, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CmsError> {
        let query = CmsQuery::new().sort(&["name:asc"]);
        let response = self.fetch("/categories", &query).await?;
        Ok(extract_categories(&response))
    }

    // =========================================================================
    // Site singletons
    // =========================================================================

    /// Business name, contact details and logo.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn global(&self) -> Result<SiteSettings, CmsError> {
        let query = CmsQuery::new().populate(&["logo"]);
        let response = self.fetch("/global", &query).await?;
        Ok(extract_site_settings(&response, self.base_url()))
    }

    /// Footer icons and social links.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn footer(&self) -> Result<Footer, CmsError> {
        let query = CmsQuery::new().populate(&[
            "nameIcon",
            "emailIcon",
            "phoneIcon",
            "socialLinks",
            "socialLinks.icon",
        ]);
        let response = self.fetch("/footer", &query).await?;
        Ok(extract_footer(&response, self.base_url()))
    }

    /// Home page nav section and the editor's featured product pick.
    ///
    /// Drafts are included when `state` is `Preview`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn home(&self, state: PublicationState) -> Result<HomeContent, CmsError> {
        let mut query = CmsQuery::new().populate(&[
            "navSection",
            "navSection.leftItems",
            "navSection.rightItems",
            "navSection.image",
            "navSection.product",
        ]);
        if state == PublicationState::Preview {
            query = query.publication_state(state);
        }

        let response = self.fetch("/home", &query).await?;
        Ok(extract_home(&response, self.base_url()))
    }

    /// The product for the home page "New" section.
    ///
    /// Looks up the selected id, else the selected document id, else the most
    /// recently created product.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS request fails.
    #[instrument(skip(self))]
    pub async fn featured_product(
        &self,
        selected: &SelectedProduct,
        state: PublicationState,
    ) -> Result<Option<FeaturedProduct>, CmsError> {
        let query = CmsQuery::new()
            .populate(&["category", "art"])
            .fields(FEATURED_FIELDS)
            .publication_state(state)
            .page_size(1);

        let query = match (&selected.id, &selected.document_id) {
            (Some(id), _) => query.filter_eq("id", id),
            (None, Some(document_id)) => query.filter_eq("documentId", document_id),
            (None, None) => query.sort(&["createdAt:desc"]),
        };

        let response = self.fetch("/products", &query).await?;
        Ok(first_entry(&response)
            .map(|node| extract_featured_product(node, self.base_url())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_errors() {
        let config = CmsConfig {
            base_url: String::new(),
            token: None,
            cache_ttl: Duration::from_secs(60),
        };
        let client = CmsClient::new(&config);
        let err = client.products().await.unwrap_err();
        assert!(matches!(err, CmsError::NotConfigured));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = CmsConfig {
            base_url: "http://localhost:1337/".to_string(),
            token: None,
            cache_ttl: Duration::from_secs(60),
        };
        assert_eq!(CmsClient::new(&config).base_url(), "http://localhost:1337");
    }
}
