//! Mock catalog API.

use super::lock;
use crate::catalog::{CatalogScope, ProductQuery};
use crate::category::CategoryPath;
use crate::error::ApiError;
use crate::models::{AvailableFilters, CategoryMenu, CheckboxFilter, Product, ProductPage, YearRange};
use crate::providers::CatalogApi;
use crate::query::SortField;
use std::collections::{BTreeSet, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Default)]
struct CatalogData {
    products: Vec<(Product, Option<CategoryPath>)>,
    menu: CategoryMenu,
    product_failure: Option<ApiError>,
    filter_failure: Option<ApiError>,
    suggestion_failure: Option<ApiError>,
    category_failure: Option<ApiError>,
    product_delays: VecDeque<Duration>,
    product_requests: Vec<ProductQuery>,
    filter_requests: Vec<(CatalogScope, Option<String>)>,
    suggestion_requests: Vec<String>,
}

/// In-memory catalog.
///
/// Filters, sorts and paginates its products the way the backend does.
/// Pages past the end come back empty with the real totals.
#[derive(Debug, Clone, Default)]
pub struct MockCatalogApi {
    data: Arc<Mutex<CatalogData>>,
}

impl MockCatalogApi {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product, optionally filed under a category.
    #[must_use]
    pub fn with_product(self, product: Product, category: Option<CategoryPath>) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.products.push((product, category));
        }
        self
    }

    /// Set the category menu.
    #[must_use]
    pub fn with_menu(self, menu: CategoryMenu) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.menu = menu;
        }
        self
    }

    /// Fail product requests with `error` (`None` to recover).
    pub fn fail_products(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.product_failure = error;
        }
    }

    /// Fail filter requests with `error` (`None` to recover).
    pub fn fail_filters(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.filter_failure = error;
        }
    }

    /// Fail suggestion requests with `error` (`None` to recover).
    pub fn fail_suggestions(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.suggestion_failure = error;
        }
    }

    /// Fail the category menu with `error` (`None` to recover).
    pub fn fail_categories(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.category_failure = error;
        }
    }

    /// Delay the next product responses, one entry per request.
    pub fn delay_products(&self, delays: impl IntoIterator<Item = Duration>) {
        if let Ok(mut data) = self.data.lock() {
            data.product_delays.extend(delays);
        }
    }

    /// Product requests received, oldest first.
    #[must_use]
    pub fn product_requests(&self) -> Vec<ProductQuery> {
        self.data
            .lock()
            .map(|d| d.product_requests.clone())
            .unwrap_or_default()
    }

    /// Filter requests received, oldest first.
    #[must_use]
    pub fn filter_requests(&self) -> Vec<(CatalogScope, Option<String>)> {
        self.data
            .lock()
            .map(|d| d.filter_requests.clone())
            .unwrap_or_default()
    }

    /// Suggestion inputs received, oldest first.
    #[must_use]
    pub fn suggestion_requests(&self) -> Vec<String> {
        self.data
            .lock()
            .map(|d| d.suggestion_requests.clone())
            .unwrap_or_default()
    }
}

fn in_scope(scope: &CatalogScope, category: Option<&CategoryPath>) -> bool {
    match (scope, category) {
        (CatalogScope::All, _) => true,
        (CatalogScope::Category(_), None) => false,
        (CatalogScope::Category(wanted), Some(path)) => {
            wanted.master == path.master
                && wanted.sub.is_none_or(|sub| path.sub == Some(sub))
                && wanted
                    .article_type
                    .is_none_or(|article| path.article_type == Some(article))
        },
    }
}

fn matches_search(product: &Product, search: Option<&str>) -> bool {
    search.is_none_or(|search| {
        product
            .product_display_name
            .to_lowercase()
            .contains(&search.to_lowercase())
    })
}

fn select(data: &CatalogData, query: &ProductQuery) -> Vec<Product> {
    let mut selected: Vec<Product> = data
        .products
        .iter()
        .filter(|(_, category)| in_scope(&query.scope, category.as_ref()))
        .map(|(product, _)| product)
        .filter(|p| {
            query
                .gender
                .is_none_or(|g| p.gender.eq_ignore_ascii_case(g.as_str()))
        })
        .filter(|p| query.min_year.is_none_or(|min| p.year >= min))
        .filter(|p| query.max_year.is_none_or(|max| p.year <= max))
        .filter(|p| matches_search(p, query.search.as_deref()))
        .cloned()
        .collect();

    selected.sort_by(|a, b| {
        let order = match query.ordering.field {
            SortField::Id => a.product_id.cmp(&b.product_id),
            SortField::Year => a.year.cmp(&b.year),
            SortField::ProductDisplayName => a.product_display_name.cmp(&b.product_display_name),
        };
        if query.ordering.descending {
            order.reverse()
        } else {
            order
        }
    });
    selected
}

fn paginate(products: Vec<Product>, page: u32, per_page: u32) -> ProductPage {
    let per_page = per_page.max(1) as usize;
    let total_items = products.len();
    let total_pages = total_items.div_ceil(per_page);
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);
    let products: Vec<Product> = products.into_iter().skip(start).take(per_page).collect();

    ProductPage {
        prev_page: (page > 1 && total_pages > 0).then(|| format!("?page={}", page - 1)),
        next_page: ((page as usize) < total_pages).then(|| format!("?page={}", page + 1)),
        products,
        total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        total_items: total_items as u64,
    }
}

impl CatalogApi for MockCatalogApi {
    fn fetch_products(
        &self,
        query: &ProductQuery,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let query = query.clone();

        async move {
            let delay = {
                let mut data = lock(&data)?;
                data.product_requests.push(query.clone());
                data.product_delays.pop_front()
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let data = lock(&data)?;
            if let Some(error) = &data.product_failure {
                return Err(error.clone());
            }
            Ok(paginate(select(&data, &query), query.page, query.per_page))
        }
    }

    fn fetch_filters(
        &self,
        scope: &CatalogScope,
        search: Option<&str>,
    ) -> impl Future<Output = Result<AvailableFilters, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let scope = *scope;
        let search = search.map(str::to_string);

        async move {
            let mut data = lock(&data)?;
            data.filter_requests.push((scope, search.clone()));
            if let Some(error) = &data.filter_failure {
                return Err(error.clone());
            }

            let search = if scope.is_category() { None } else { search };
            let matching: Vec<&Product> = data
                .products
                .iter()
                .filter(|(_, category)| in_scope(&scope, category.as_ref()))
                .map(|(product, _)| product)
                .filter(|p| matches_search(p, search.as_deref()))
                .collect();

            if matching.is_empty() {
                return Ok(AvailableFilters::default());
            }
            let genders: BTreeSet<String> = matching.iter().map(|p| p.gender.clone()).collect();
            let min = matching.iter().map(|p| p.year).min().unwrap_or_default();
            let max = matching.iter().map(|p| p.year).max().unwrap_or_default();
            Ok(AvailableFilters {
                gender: Some(CheckboxFilter {
                    values: genders.into_iter().collect(),
                }),
                year: Some(YearRange { min, max }),
            })
        }
    }

    fn fetch_suggestions(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let input = input.to_string();

        async move {
            let mut data = lock(&data)?;
            data.suggestion_requests.push(input.clone());
            if let Some(error) = &data.suggestion_failure {
                return Err(error.clone());
            }
            let needle = input.to_lowercase();
            Ok(data
                .products
                .iter()
                .map(|(p, _)| &p.product_display_name)
                .filter(|name| name.to_lowercase().contains(&needle))
                .take(MAX_SUGGESTIONS)
                .cloned()
                .collect())
        }
    }

    fn fetch_categories(&self) -> impl Future<Output = Result<CategoryMenu, ApiError>> + Send {
        let data = Arc::clone(&self.data);

        async move {
            let data = lock(&data)?;
            match &data.category_failure {
                Some(error) => Err(error.clone()),
                None => Ok(data.menu.clone()),
            }
        }
    }
}
