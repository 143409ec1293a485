//! Client configuration.
//!
//! Values are supplied by the application; [`StorefrontConfig::from_env`]
//! reads the handful of settings that vary per deployment.

use crate::constants::{DEFAULT_ITEMS_PER_PAGE, ITEMS_PER_PAGE_OPTIONS};
use crate::error::{Result, StorefrontError};
use std::time::Duration;

/// Environment variable holding the API base URL.
pub const API_BASE_URL_ENV: &str = "STOREFRONT_API_BASE_URL";

/// Environment variable holding the request timeout in whole seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL of the REST backend, without trailing slash
    /// (e.g. `http://localhost:8000/api/v1`).
    pub api_base_url: String,

    /// Per-request transport timeout.
    ///
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// Quiet period before a search-suggestion request is issued.
    ///
    /// Default: 300 ms
    pub search_debounce: Duration,

    /// Minimum trimmed input length that triggers suggestions.
    ///
    /// Default: 2
    pub suggestion_min_chars: usize,

    /// Page size used when the URL carries no `per_page`.
    ///
    /// Default: 12
    pub default_items_per_page: u32,
}

impl StorefrontConfig {
    /// Create configuration for the given API base URL.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Read configuration from the environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] if the timeout is not a positive
    /// integer or the base URL does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(API_BASE_URL_ENV) {
            Ok(url) => Self::new(url),
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var(REQUEST_TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    StorefrontError::Config(format!("{REQUEST_TIMEOUT_ENV} must be a positive integer, got {raw:?}"))
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] for an unparsable base URL or a
    /// default page size outside the allowed options.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_base_url).map_err(|e| {
            StorefrontError::Config(format!("invalid API base URL {:?}: {e}", self.api_base_url))
        })?;

        if !ITEMS_PER_PAGE_OPTIONS.contains(&self.default_items_per_page) {
            return Err(StorefrontError::Config(format!(
                "default_items_per_page must be one of {ITEMS_PER_PAGE_OPTIONS:?}, got {}",
                self.default_items_per_page
            )));
        }
        Ok(())
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the suggestion debounce.
    #[must_use]
    pub const fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Set the minimum suggestion input length.
    #[must_use]
    pub const fn with_suggestion_min_chars(mut self, chars: usize) -> Self {
        self.suggestion_min_chars = chars;
        self
    }

    /// Set the default page size.
    #[must_use]
    pub const fn with_default_items_per_page(mut self, count: u32) -> Self {
        self.default_items_per_page = count;
        self
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            request_timeout: Duration::from_secs(10),
            search_debounce: Duration::from_millis(300),
            suggestion_min_chars: 2,
            default_items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(config.suggestion_min_chars, 2);
        assert_eq!(config.default_items_per_page, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn new_strips_trailing_slash() {
        let config = StorefrontConfig::new("https://shop.example.com/api/v1/");
        assert_eq!(config.api_base_url, "https://shop.example.com/api/v1");
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(StorefrontConfig::new("not a url").validate().is_err());
        assert!(
            StorefrontConfig::default()
                .with_default_items_per_page(10)
                .validate()
                .is_err()
        );
    }
}
