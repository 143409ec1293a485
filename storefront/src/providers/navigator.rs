//! Router abstraction.

use crate::query::RouteQuery;
use std::future::Future;
use thiserror::Error;

/// Navigation was refused by the router.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Navigation failed: {0}")]
pub struct NavigationError(pub String);

/// Pushes a new query string for the current route.
///
/// The path (and its category slugs) is left as is; only the query
/// changes. Implementations should report the change back as a
/// `QueryChanged` action only when it originates outside the store
/// (back/forward, manual edits).
pub trait Navigator: Send + Sync {
    /// Replace the current route's query.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError`] if the router rejects the navigation.
    fn push(&self, query: &RouteQuery) -> impl Future<Output = Result<(), NavigationError>> + Send;
}
