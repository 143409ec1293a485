//! Catalog query coordinator.
//!
//! One store serves both the all-products listing and every category
//! listing. It keeps [`FilterState`](crate::filters::FilterState),
//! [`PaginationState`](crate::pagination::PaginationState), the ordering
//! and the route query consistent, and fetches whenever the visible
//! results would change.
//!
//! # Flow
//!
//! - URL driven: `Enter` / `QueryChanged` parse the query into state, raise
//!   the sync guard, then fetch filters and products.
//! - User driven: filter, page, ordering and page-size edits derive a new
//!   query from state, push it, then fetch.
//!
//! Every fetch carries a generation number. A result whose generation is
//! no longer current is dropped, so a slow superseded response never
//! overwrites a newer one.

mod actions;
mod environment;
mod reducer;
mod state;

pub use actions::CatalogAction;
pub use environment::CatalogEnvironment;
pub use reducer::CatalogReducer;
pub use state::{CatalogState, Generations};

use crate::category::{CategoryPath, CategoryTree};
use crate::filters::Gender;
use crate::query::{Ordering, keys};

/// Which listing a catalog store is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CatalogScope {
    /// Every product.
    #[default]
    All,
    /// Products of one category node.
    Category(CategoryPath),
}

impl CatalogScope {
    /// Scope for route slugs: no slug is [`CatalogScope::All`], otherwise
    /// the slugs must resolve in `tree`.
    #[must_use]
    pub fn from_slugs<S: AsRef<str>>(tree: &CategoryTree, slugs: &[S]) -> Option<Self> {
        if slugs.is_empty() {
            return Some(Self::All);
        }
        tree.resolve(slugs).map(Self::Category)
    }

    /// Whether this is a category listing.
    #[must_use]
    pub const fn is_category(&self) -> bool {
        matches!(self, Self::Category(_))
    }

    /// API path of the product listing, relative to the base URL.
    #[must_use]
    pub fn products_path(&self) -> String {
        self.path("products")
    }

    /// API path of the filter options, relative to the base URL.
    #[must_use]
    pub fn filters_path(&self) -> String {
        match self {
            Self::All => "catalog/products/filters".to_string(),
            Self::Category(_) => self.path("filters"),
        }
    }

    fn path(&self, resource: &str) -> String {
        match self {
            Self::All => format!("catalog/{resource}"),
            Self::Category(path) => {
                let ids: Vec<String> = path.ids().iter().map(ToString::to_string).collect();
                format!("catalog/categories/{}/{resource}", ids.join("/"))
            },
        }
    }
}

/// Parameters of one product-page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Listing to read from.
    pub scope: CatalogScope,
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Sort order.
    pub ordering: Ordering,
    /// Gender filter.
    pub gender: Option<Gender>,
    /// Lower year bound.
    pub min_year: Option<i32>,
    /// Upper year bound.
    pub max_year: Option<i32>,
    /// Trimmed, non-empty search.
    pub search: Option<String>,
}

impl ProductQuery {
    /// Request parameters in wire form.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (keys::PAGE, self.page.to_string()),
            (keys::PER_PAGE, self.per_page.to_string()),
            (keys::ORDERING, self.ordering.to_param()),
        ];
        if let Some(gender) = self.gender {
            params.push((keys::GENDER, gender.as_str().to_string()));
        }
        if let Some(min) = self.min_year {
            params.push((keys::MIN_YEAR, min.to_string()));
        }
        if let Some(max) = self.max_year {
            params.push((keys::MAX_YEAR, max.to_string()));
        }
        if let Some(search) = &self.search {
            params.push((keys::SEARCH, search.clone()));
        }
        params
    }
}
