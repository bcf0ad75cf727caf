//! Application state shared across handlers.

use std::sync::Arc;

use under_the_hood_core::PublicationState;

use crate::cms::CmsClient;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the CMS client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cms: CmsClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let cms = CmsClient::new(&config.cms);
        Self {
            inner: Arc::new(AppStateInner { config, cms }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the CMS client.
    #[must_use]
    pub fn cms(&self) -> &CmsClient {
        &self.inner.cms
    }

    /// Draft content is visible outside production.
    #[must_use]
    pub fn publication_state(&self) -> PublicationState {
        if self.inner.config.environment.is_production() {
            PublicationState::Live
        } else {
            PublicationState::Preview
        }
    }
}
