//! Catalog store actions.

use super::CatalogScope;
use crate::error::ApiError;
use crate::filters::FilterChange;
use crate::models::{AvailableFilters, ProductPage};
use crate::query::{Ordering, RouteQuery};

/// Inputs to the catalog store.
///
/// The `*Loaded` variants are produced by effects and carry the generation
/// they were issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogAction {
    // ═══════════════════════════════════════════════════════════
    // Route
    // ═══════════════════════════════════════════════════════════
    /// A listing route was entered.
    Enter {
        /// Resolved listing.
        scope: CatalogScope,
        /// Route query.
        query: RouteQuery,
    },
    /// The route query changed outside the store (back/forward, edits).
    QueryChanged {
        /// New route query.
        query: RouteQuery,
    },
    /// The listing route was left; in-flight results are discarded.
    Leave,

    // ═══════════════════════════════════════════════════════════
    // User edits
    // ═══════════════════════════════════════════════════════════
    /// Change one filter.
    SetFilter {
        /// The edit.
        change: FilterChange,
    },
    /// Clear gender, years and (outside categories) the search.
    ClearAllFilters,
    /// Go to a page.
    SetPage {
        /// 1-based page.
        page: u32,
    },
    /// Change the sort order.
    SetOrdering {
        /// New order.
        ordering: Ordering,
    },
    /// Change the page size.
    SetItemsPerPage {
        /// One of the allowed sizes.
        count: u32,
    },
    /// Submit a search.
    SetSearch {
        /// Raw search text.
        query: String,
    },
    /// Remove the search.
    ClearSearch,
    /// Open, close (`Some`) or toggle (`None`) the filter drawer.
    ToggleFilterDrawer {
        /// Target state.
        open: Option<bool>,
    },
    /// Search box text changed.
    SearchInputChanged {
        /// Raw text.
        input: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Effect results
    // ═══════════════════════════════════════════════════════════
    /// Debounce window for a suggestion request elapsed.
    SuggestionsDebounced {
        /// Generation at the keystroke.
        generation: u64,
    },
    /// Suggestions arrived.
    SuggestionsLoaded {
        /// Request generation.
        generation: u64,
        /// Suggestions or failure.
        result: Result<Vec<String>, ApiError>,
    },
    /// A product page arrived.
    ProductsLoaded {
        /// Request generation.
        generation: u64,
        /// Page that was requested.
        page: u32,
        /// Page or failure.
        result: Result<ProductPage, ApiError>,
    },
    /// Available filters arrived.
    FiltersLoaded {
        /// Request generation.
        generation: u64,
        /// Options or failure.
        result: Result<AvailableFilters, ApiError>,
    },
}
