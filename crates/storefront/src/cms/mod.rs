//! Headless CMS client and response adapters.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; the CMS is the source of truth for all content
//! - In-memory caching via `moka` for raw JSON responses (60 second TTL)
//! - Every entity has one normalisation function over `serde_json::Value`,
//!   so flat records and `data.attributes`-wrapped records produce the same
//!   view model
//!
//! # Example
//!
//! ```rust,ignore
//! use under_the_hood_storefront::cms::CmsClient;
//!
//! let client = CmsClient::new(&config.cms);
//! let products = client.products().await?;
//! let product = client.product_by_slug("smoky-rub").await?;
//! ```

mod client;
pub mod conversions;
mod query;
pub mod types;

pub use client::CmsClient;
pub use query::CmsQuery;
pub use types::*;

use thiserror::Error;

/// Longest response body kept in an error.
const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur when talking to the CMS.
#[derive(Debug, Error)]
pub enum CmsError {
    /// No CMS base URL was configured.
    #[error("CMS base URL is not configured")]
    NotConfigured,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CMS answered with a non-success status.
    #[error("CMS returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CmsError {
    /// Build a status error, keeping at most the first 200 characters of the body.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        }
    }
}
