//! Catalog store state.

use super::{CatalogScope, ProductQuery};
use crate::error::ApiError;
use crate::filters::FilterState;
use crate::models::Product;
use crate::pagination::PaginationState;
use crate::query::{Ordering, RouteQuery, keys};

/// Latest issued request number per fetch kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generations {
    /// Product page requests.
    pub products: u64,
    /// Available-filter requests.
    pub filters: u64,
    /// Suggestion requests (bumped on every keystroke).
    pub suggestions: u64,
}

impl Generations {
    /// Every kind advanced by one, invalidating all in-flight requests.
    #[must_use]
    pub const fn bumped(self) -> Self {
        Self {
            products: self.products + 1,
            filters: self.filters + 1,
            suggestions: self.suggestions + 1,
        }
    }
}

/// State of one catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    /// Listing being shown.
    pub scope: CatalogScope,
    /// Route query as last pushed or received.
    pub query: RouteQuery,
    /// Active and available filters.
    pub filters: FilterState,
    /// Page position and totals.
    pub pagination: PaginationState,
    /// Sort order.
    pub ordering: Ordering,
    /// Products of the current page.
    pub products: Vec<Product>,
    /// Product request in flight.
    pub loading: bool,
    /// Last product failure.
    pub error: Option<ApiError>,
    /// Suggestions for `suggestion_input`.
    pub suggestions: Vec<String>,
    /// Suggestion request in flight.
    pub suggestions_loading: bool,
    /// Raw text typed into the search box.
    pub suggestion_input: String,
    /// Request fencing.
    pub generations: Generations,
    /// Page shown before a page-size change, corrected against the new
    /// totals once page 1 loads.
    pub page_before_resize: Option<u32>,
}

impl CatalogState {
    /// Empty listing with the given page size.
    #[must_use]
    pub fn new(items_per_page: u32) -> Self {
        Self {
            scope: CatalogScope::All,
            query: RouteQuery::new(),
            filters: FilterState::default(),
            pagination: PaginationState::new(items_per_page),
            ordering: Ordering::default(),
            products: Vec::new(),
            loading: false,
            error: None,
            suggestions: Vec::new(),
            suggestions_loading: false,
            suggestion_input: String::new(),
            generations: Generations::default(),
            page_before_resize: None,
        }
    }

    /// Whether the current page has products.
    #[must_use]
    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }

    /// Whether a finished load came back without products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.products.is_empty()
    }

    /// Request for the current page under the current filters.
    #[must_use]
    pub fn product_query(&self) -> ProductQuery {
        let search = self.filters.search_query.trim();
        ProductQuery {
            scope: self.scope,
            page: self.pagination.current_page,
            per_page: self.pagination.items_per_page,
            ordering: self.ordering,
            gender: self.filters.gender,
            min_year: self.filters.min_year,
            max_year: self.filters.max_year,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }

    /// Route query reflecting current state.
    ///
    /// Filter keys are rebuilt, `page` is omitted on page 1, `ordering` is
    /// omitted at the default and `per_page` is rewritten only once it is
    /// already part of the URL or differs from `default_per_page`. Other
    /// keys are preserved.
    #[must_use]
    pub fn canonical_query(&self, default_per_page: u32) -> RouteQuery {
        let mut query = self.filters.build_query(&self.query);

        if self.pagination.current_page > 1 {
            query.set(keys::PAGE, self.pagination.current_page.to_string());
        } else {
            query.remove(keys::PAGE);
        }

        if self.ordering.is_default() {
            query.remove(keys::ORDERING);
        } else {
            query.set(keys::ORDERING, self.ordering.to_param());
        }

        let per_page = self.pagination.items_per_page;
        if query.contains(keys::PER_PAGE) || per_page != default_per_page {
            query.set(keys::PER_PAGE, per_page.to_string());
        }
        query
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_ITEMS_PER_PAGE)
    }
}
