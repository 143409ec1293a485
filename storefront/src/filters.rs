//! Filter state for a product listing.
//!
//! Holds the active filters (gender, year range, free-text search), the
//! options the backend offers, and the flags the coordinator uses to keep
//! URL and state in step.
//!
//! # Invariants
//!
//! - `min_year <= max_year` whenever both are set
//! - user mutations are rejected while `is_updating_filters` is raised

use crate::error::{ApiError, FilterError};
use crate::models::AvailableFilters;
use crate::query::{RouteQuery, keys};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Men
    Men,
    /// Women
    Women,
    /// Boys
    Boys,
    /// Girls
    Girls,
    /// Unisex
    Unisex,
}

impl Gender {
    /// Case-insensitive parse; unknown values yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "men" => Some(Self::Men),
            "women" => Some(Self::Women),
            "boys" => Some(Self::Boys),
            "girls" => Some(Self::Girls),
            "unisex" => Some(Self::Unisex),
            _ => None,
        }
    }

    /// Lowercase value used in URLs and API requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Boys => "boys",
            Self::Girls => "girls",
            Self::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user edit to the active filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// Select or clear the gender.
    Gender(Option<Gender>),
    /// Set or clear the lower year bound.
    MinYear(Option<i32>),
    /// Set or clear the upper year bound.
    MaxYear(Option<i32>),
    /// Replace both year bounds at once.
    YearRange {
        /// Lower bound
        min: Option<i32>,
        /// Upper bound
        max: Option<i32>,
    },
}

/// Active and available filters plus synchronisation flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Selected gender.
    pub gender: Option<Gender>,
    /// Lower year bound.
    pub min_year: Option<i32>,
    /// Upper year bound.
    pub max_year: Option<i32>,
    /// Free-text search, stored trimmed.
    pub search_query: String,
    /// Options offered by the backend.
    pub available: AvailableFilters,
    /// Raised while state is being loaded from the URL.
    pub is_updating_filters: bool,
    /// Whether the filter drawer is shown.
    pub is_filter_drawer_open: bool,
    /// Available filters request in flight.
    pub filters_loading: bool,
    /// Last available filters failure.
    pub filters_error: Option<ApiError>,
}

impl FilterState {
    /// Apply a user edit.
    ///
    /// # Errors
    ///
    /// - [`FilterError::SyncInProgress`] while a URL-driven load is running
    /// - [`FilterError::InvalidYearRange`] if the result would have
    ///   `min_year > max_year`; state is left unchanged
    pub fn set_filter(&mut self, change: FilterChange) -> Result<(), FilterError> {
        if self.is_updating_filters {
            return Err(FilterError::SyncInProgress);
        }

        let (min, max) = match change {
            FilterChange::Gender(gender) => {
                self.gender = gender;
                return Ok(());
            },
            FilterChange::MinYear(min) => (min, self.max_year),
            FilterChange::MaxYear(max) => (self.min_year, max),
            FilterChange::YearRange { min, max } => (min, max),
        };

        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(FilterError::InvalidYearRange { min, max });
            }
        }

        self.min_year = min;
        self.max_year = max;
        Ok(())
    }

    /// Seed active filters from URL parameters.
    ///
    /// Unknown genders and malformed years are treated as absent. A range
    /// with `min_year > max_year` is discarded entirely. The search is
    /// trimmed.
    pub fn load_from_query(&mut self, query: &RouteQuery) {
        let year = |key: &str| query.get(key).and_then(|raw| raw.trim().parse::<i32>().ok());

        self.gender = query.get(keys::GENDER).and_then(Gender::parse);
        self.min_year = year(keys::MIN_YEAR);
        self.max_year = year(keys::MAX_YEAR);
        if let (Some(min), Some(max)) = (self.min_year, self.max_year) {
            if min > max {
                self.min_year = None;
                self.max_year = None;
            }
        }
        self.search_query = query
            .get(keys::SEARCH)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
    }

    /// Rewrite the filter keys of `current`, preserving everything else.
    ///
    /// A filter at its default is omitted: no gender, a year bound equal to
    /// the available bound (or with no available range), an empty search.
    #[must_use]
    pub fn build_query(&self, current: &RouteQuery) -> RouteQuery {
        let mut query = current.clone();
        for key in keys::FILTER_KEYS {
            query.remove(key);
        }

        if let Some(gender) = self.gender {
            query.set(keys::GENDER, gender.as_str());
        }

        if let Some(range) = self.available.year {
            if let Some(min) = self.min_year.filter(|min| *min != range.min) {
                query.set(keys::MIN_YEAR, min.to_string());
            }
            if let Some(max) = self.max_year.filter(|max| *max != range.max) {
                query.set(keys::MAX_YEAR, max.to_string());
            }
        }

        let search = self.search_query.trim();
        if !search.is_empty() {
            query.set(keys::SEARCH, search);
        }
        query
    }

    /// Reset active filters and search; the drawer stays open if it was.
    pub fn clear(&mut self) {
        let drawer_open = self.is_filter_drawer_open;
        self.gender = None;
        self.min_year = None;
        self.max_year = None;
        self.search_query.clear();
        self.is_filter_drawer_open = drawer_open;
    }

    /// Clear the gender filter.
    pub fn clear_gender(&mut self) {
        self.gender = None;
    }

    /// Clear both year bounds.
    pub fn clear_year(&mut self) {
        self.min_year = None;
        self.max_year = None;
    }

    /// Clear the search.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Replace the search; stored trimmed.
    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.trim().to_string();
    }

    /// Open, close or toggle the drawer.
    pub fn toggle_drawer(&mut self, open: Option<bool>) {
        self.is_filter_drawer_open = open.unwrap_or(!self.is_filter_drawer_open);
    }

    /// Replace available filters; `None` resets to the neutral shape.
    pub fn set_available(&mut self, available: Option<AvailableFilters>) {
        self.available = available.unwrap_or_default();
    }

    /// Active filter count: gender, year range and search each count once.
    #[must_use]
    pub fn active_filters_count(&self) -> usize {
        [
            self.gender.is_some(),
            self.min_year.is_some() || self.max_year.is_some(),
            !self.search_query.trim().is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether any filter is active.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.active_filters_count() > 0
    }

    /// Whether the backend offers any filter.
    #[must_use]
    pub const fn has_available_filters(&self) -> bool {
        !self.available.is_neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckboxFilter, YearRange};

    fn with_years(min: i32, max: i32) -> FilterState {
        FilterState {
            available: AvailableFilters {
                gender: Some(CheckboxFilter {
                    values: vec!["Men".into(), "Women".into()],
                }),
                year: Some(YearRange { min, max }),
            },
            ..FilterState::default()
        }
    }

    #[test]
    fn women_from_2020_omits_max_year() {
        let mut filters = with_years(2010, 2023);
        let query = RouteQuery::parse("gender=women&min_year=2020");

        filters.load_from_query(&query);

        assert_eq!(filters.gender, Some(Gender::Women));
        assert_eq!(filters.min_year, Some(2020));
        assert_eq!(filters.max_year, None);
        let built = filters.build_query(&query);
        assert_eq!(built.to_query_string(), "gender=women&min_year=2020");
    }

    #[test]
    fn malformed_values_are_absent() {
        let mut filters = FilterState::default();
        filters.load_from_query(&RouteQuery::parse("gender=aliens&min_year=20x0&max_year=2019&q=%20%20"));
        assert_eq!(filters.gender, None);
        assert_eq!(filters.min_year, None);
        assert_eq!(filters.max_year, Some(2019));
        assert_eq!(filters.search_query, "");
    }

    #[test]
    fn inverted_range_from_url_is_dropped() {
        let mut filters = FilterState::default();
        filters.load_from_query(&RouteQuery::parse("min_year=2022&max_year=2015"));
        assert_eq!((filters.min_year, filters.max_year), (None, None));
    }

    #[test]
    fn bounds_equal_to_available_are_omitted() {
        let mut filters = with_years(2010, 2023);
        filters.min_year = Some(2010);
        filters.max_year = Some(2023);
        let query = filters.build_query(&RouteQuery::parse("per_page=16&gender=men"));
        assert_eq!(query.to_query_string(), "per_page=16");
    }

    #[test]
    fn years_omitted_without_available_range() {
        let mut filters = FilterState::default();
        filters.min_year = Some(2015);
        assert!(filters.build_query(&RouteQuery::new()).is_empty());
    }

    #[test]
    fn search_is_trimmed_and_empty_omitted() {
        let mut filters = FilterState::default();
        filters.set_search("  red dress ");
        assert_eq!(
            filters.build_query(&RouteQuery::new()).get("q"),
            Some("red dress")
        );
        filters.set_search("   ");
        assert!(!filters.build_query(&RouteQuery::new()).contains("q"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut filters = FilterState::default();
        assert!(filters.set_filter(FilterChange::MinYear(Some(2020))).is_ok());
        assert_eq!(
            filters.set_filter(FilterChange::MaxYear(Some(2019))),
            Err(FilterError::InvalidYearRange { min: 2020, max: 2019 })
        );
        assert_eq!(filters.max_year, None);
    }

    #[test]
    fn edits_rejected_during_sync() {
        let mut filters = FilterState {
            is_updating_filters: true,
            ..FilterState::default()
        };
        assert_eq!(
            filters.set_filter(FilterChange::Gender(Some(Gender::Men))),
            Err(FilterError::SyncInProgress)
        );
        assert_eq!(filters.gender, None);
    }

    #[test]
    fn clear_keeps_drawer_open() {
        let mut filters = with_years(2010, 2023);
        filters.gender = Some(Gender::Girls);
        filters.search_query = "shoes".into();
        filters.toggle_drawer(Some(true));

        filters.clear();

        assert!(!filters.has_active_filters());
        assert!(filters.is_filter_drawer_open);
        assert!(filters.has_available_filters());
    }

    #[test]
    fn neutral_available_after_reset() {
        let mut filters = with_years(2010, 2023);
        filters.clear();
        filters.set_available(None);
        assert_eq!(filters.available, AvailableFilters::default());
        assert!(!filters.has_available_filters());
    }

    #[test]
    fn active_count_counts_year_once() {
        let mut filters = FilterState::default();
        filters.min_year = Some(2012);
        filters.max_year = Some(2014);
        filters.gender = Some(Gender::Unisex);
        assert_eq!(filters.active_filters_count(), 2);
    }
}
