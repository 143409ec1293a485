//! REST backend client.
//!
//! [`HttpClient`] implements every API provider trait over `reqwest`.
//! Non-success responses become [`ApiError::from_response`]; a request that
//! never produced a response (or a body that fails to decode) becomes
//! [`ApiError::network`].

use crate::catalog::{CatalogScope, ProductQuery};
use crate::config::StorefrontConfig;
use crate::error::{ApiError, Result, StorefrontError};
use crate::models::{
    AccountResponse, ActivationRequest, AvailableFilters, CategoryMenu, Credentials,
    CurrentUserResponse, LogoutResponse, ProductPage, ProvidersResponse,
    ResendActivationResponse, SocialAuthRequest, SocialAuthResponse, SuggestionsResponse,
    TokenPair,
};
use crate::providers::{AccountApi, CatalogApi, SocialAuthApi};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// HTTP implementation of the storefront providers.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client for `config.api_base_url` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] for an invalid configuration and
    /// [`StorefrontError::HttpClient`] if the TLS backend cannot be set up.
    pub fn new(config: &StorefrontConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StorefrontError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: String,
        params: Vec<(&'static str, String)>,
        bearer: Option<String>,
    ) -> std::result::Result<T, ApiError> {
        let mut request = self.client.get(self.url(&path)).query(&params);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        execute(request, &path).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &'static str,
        body: &B,
    ) -> std::result::Result<T, ApiError> {
        execute(self.client.post(self.url(path)).json(body), path).await
    }
}

async fn execute<T: DeserializeOwned>(
    request: RequestBuilder,
    path: &str,
) -> std::result::Result<T, ApiError> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(path, error = %e, "Request failed without response");
        ApiError::network()
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(path, status = status.as_u16(), "Request rejected");
        return Err(ApiError::from_response(status.as_u16(), &body));
    }

    response.json::<T>().await.map_err(|e| {
        tracing::warn!(path, error = %e, "Response body did not decode");
        ApiError::network()
    })
}

#[derive(Serialize)]
struct RefreshTokenBody<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

impl CatalogApi for HttpClient {
    fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = std::result::Result<ProductPage, ApiError>> + Send {
        self.get(query.scope.products_path(), query.params(), None)
    }

    fn fetch_filters(
        &self,
        scope: &CatalogScope,
        search: Option<&str>,
    ) -> impl Future<Output = std::result::Result<AvailableFilters, ApiError>> + Send {
        // Category filters ignore the search term.
        let params = match (scope, search.map(str::trim).filter(|s| !s.is_empty())) {
            (CatalogScope::All, Some(search)) => vec![("q", search.to_string())],
            _ => Vec::new(),
        };
        self.get(scope.filters_path(), params, None)
    }

    fn fetch_suggestions(
        &self,
        input: &str,
    ) -> impl Future<Output = std::result::Result<Vec<String>, ApiError>> + Send {
        let params = vec![("q", input.to_string())];
        async move {
            let response: SuggestionsResponse = self
                .get("catalog/products/suggestions".to_string(), params, None)
                .await?;
            Ok(response.suggestions)
        }
    }

    fn fetch_categories(
        &self,
    ) -> impl Future<Output = std::result::Result<CategoryMenu, ApiError>> + Send {
        self.get("catalog/categories".to_string(), Vec::new(), None)
    }
}

impl AccountApi for HttpClient {
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = std::result::Result<AccountResponse, ApiError>> + Send {
        self.post("accounts/register", credentials)
    }

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = std::result::Result<TokenPair, ApiError>> + Send {
        self.post("accounts/login", credentials)
    }

    fn logout(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = std::result::Result<LogoutResponse, ApiError>> + Send {
        async move {
            self.post("accounts/logout", &RefreshTokenBody { refresh_token })
                .await
        }
    }

    fn current_user(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = std::result::Result<CurrentUserResponse, ApiError>> + Send {
        self.get(
            "accounts/me".to_string(),
            Vec::new(),
            Some(refresh_token.to_string()),
        )
    }

    fn activate(
        &self,
        request: &ActivationRequest,
    ) -> impl Future<Output = std::result::Result<AccountResponse, ApiError>> + Send {
        self.post("accounts/activate", request)
    }

    fn resend_activation(
        &self,
        email: &str,
    ) -> impl Future<Output = std::result::Result<ResendActivationResponse, ApiError>> + Send {
        async move {
            self.post("accounts/resend-activation", &EmailBody { email })
                .await
        }
    }
}

impl SocialAuthApi for HttpClient {
    fn authenticate(
        &self,
        request: &SocialAuthRequest,
    ) -> impl Future<Output = std::result::Result<SocialAuthResponse, ApiError>> + Send {
        self.post("auth/social-auth", request)
    }

    fn providers(
        &self,
    ) -> impl Future<Output = std::result::Result<ProvidersResponse, ApiError>> + Send {
        self.get("auth/social-auth/providers".to_string(), Vec::new(), None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slashes() {
        let config = StorefrontConfig::new("http://localhost:8000/api/v1/");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(
            client.url("/catalog/products"),
            "http://localhost:8000/api/v1/catalog/products"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let config = StorefrontConfig::new("not a url");
        assert!(matches!(
            HttpClient::new(&config),
            Err(StorefrontError::Config(_))
        ));
    }
}
