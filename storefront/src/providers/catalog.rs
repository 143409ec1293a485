//! Catalog API trait.

use crate::catalog::{CatalogScope, ProductQuery};
use crate::error::ApiError;
use crate::models::{AvailableFilters, CategoryMenu, ProductPage};
use std::future::Future;

/// Read-only catalog endpoints.
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of products.
    ///
    /// `GET /catalog/products` for [`CatalogScope::All`], otherwise
    /// `GET /catalog/categories/{m}[/{s}[/{a}]]/products`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] for transport failures and
    /// non-success statuses (404 when nothing matches).
    fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send;

    /// Fetch the filter options for a scope.
    ///
    /// `search` narrows the all-products options; category scopes ignore it.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`].
    fn fetch_filters(
        &self,
        scope: &CatalogScope,
        search: Option<&str>,
    ) -> impl Future<Output = Result<AvailableFilters, ApiError>> + Send;

    /// Fetch product-name suggestions for partial input.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`].
    fn fetch_suggestions(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Fetch the category menu.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`].
    fn fetch_categories(&self) -> impl Future<Output = Result<CategoryMenu, ApiError>> + Send;
}
