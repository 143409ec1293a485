//! Catalog store dependencies.

use crate::config::StorefrontConfig;
use crate::providers::Storage;
use std::sync::Arc;

/// Collaborators of the catalog store.
#[derive(Clone)]
pub struct CatalogEnvironment<C, N> {
    /// Catalog API.
    pub api: C,
    /// Router.
    pub navigator: N,
    /// Debounce, suggestion threshold and default page size.
    pub config: StorefrontConfig,
    /// Where page-size changes are remembered, if anywhere.
    pub preferences: Option<Arc<dyn Storage>>,
}

impl<C, N> CatalogEnvironment<C, N> {
    /// Bundle the collaborators.
    #[must_use]
    pub const fn new(api: C, navigator: N, config: StorefrontConfig) -> Self {
        Self {
            api,
            navigator,
            config,
            preferences: None,
        }
    }

    /// Remember page-size changes in `storage` under `user-preferences`.
    #[must_use]
    pub fn with_preferences(mut self, storage: impl Storage + 'static) -> Self {
        self.preferences = Some(Arc::new(storage));
        self
    }
}

impl<C: std::fmt::Debug, N: std::fmt::Debug> std::fmt::Debug for CatalogEnvironment<C, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEnvironment")
            .field("api", &self.api)
            .field("navigator", &self.navigator)
            .field("config", &self.config)
            .field("preferences", &self.preferences.is_some())
            .finish()
    }
}
