//! URL query model and product ordering.
//!
//! A [`RouteQuery`] is the navigable query string of a listing page. Keys
//! are kept sorted so two queries with the same parameters compare equal
//! regardless of insertion order.

use crate::constants::ITEMS_PER_PAGE_OPTIONS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Query parameter names.
pub mod keys {
    /// Requested page (1-based, omitted for page 1).
    pub const PAGE: &str = "page";
    /// Page size.
    pub const PER_PAGE: &str = "per_page";
    /// Ordering (omitted for the default).
    pub const ORDERING: &str = "ordering";
    /// Gender filter.
    pub const GENDER: &str = "gender";
    /// Lower year bound.
    pub const MIN_YEAR: &str = "min_year";
    /// Upper year bound.
    pub const MAX_YEAR: &str = "max_year";
    /// Free-text search.
    pub const SEARCH: &str = "q";

    /// Keys owned by the filter state.
    pub const FILTER_KEYS: [&str; 4] = [GENDER, MIN_YEAR, MAX_YEAR, SEARCH];
}

/// Navigable URL query (`key=value` pairs, one value per key).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteQuery(BTreeMap<String, String>);

impl RouteQuery {
    /// Empty query.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Parse a query string (with or without leading `?`). Repeated keys keep
    /// the last value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        Self(
            url::form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Render as an encoded query string without leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a key.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Builder-style [`RouteQuery::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Requested page; absent, zero or malformed values yield `None`.
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        self.get(keys::PAGE)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
    }

    /// Requested page size; only the allowed options are recognised.
    #[must_use]
    pub fn per_page(&self) -> Option<u32> {
        self.get(keys::PER_PAGE)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|n| ITEMS_PER_PAGE_OPTIONS.contains(n))
    }

    /// Requested ordering; unknown values fall back to the default.
    #[must_use]
    pub fn ordering(&self) -> Ordering {
        self.get(keys::ORDERING)
            .and_then(Ordering::parse)
            .unwrap_or_default()
    }

    /// Whether any of `keys` differs between `self` and `other`.
    #[must_use]
    pub fn differs_in(&self, other: &Self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.get(key) != other.get(key))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteQuery {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Sortable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Product identifier.
    Id,
    /// Release year.
    Year,
    /// Display name.
    ProductDisplayName,
}

impl SortField {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Year => "year",
            Self::ProductDisplayName => "product_display_name",
        }
    }
}

/// Product listing ordering: a field, optionally descending (`-` prefix).
///
/// The default is `-id` (newest first) and is omitted from URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ordering {
    /// Field to sort by.
    pub field: SortField,
    /// Descending when true.
    pub descending: bool,
}

impl Ordering {
    /// Ascending ordering on `field`.
    #[must_use]
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending ordering on `field`.
    #[must_use]
    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parse `field` or `-field`; unknown fields yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (descending, name) = raw
            .strip_prefix('-')
            .map_or((false, raw), |rest| (true, rest));
        let field = match name {
            "id" => SortField::Id,
            "year" => SortField::Year,
            "product_display_name" => SortField::ProductDisplayName,
            _ => return None,
        };
        Some(Self { field, descending })
    }

    /// Whether this is the default ordering.
    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::default()
    }

    /// Value for the `ordering` query parameter.
    #[must_use]
    pub fn to_param(self) -> String {
        if self.descending {
            format!("-{}", self.field.as_str())
        } else {
            self.field.as_str().to_string()
        }
    }
}

impl Default for Ordering {
    fn default() -> Self {
        Self::descending(SortField::Id)
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

impl TryFrom<String> for Ordering {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown ordering {value:?}"))
    }
}

impl From<Ordering> for String {
    fn from(ordering: Ordering) -> Self {
        ordering.to_param()
    }
}
