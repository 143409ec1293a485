//! # Storefront
//!
//! Headless client for a fashion e-commerce REST backend: catalog
//! browsing with URL-synchronised filters, a three-level category menu,
//! account and session management, user preferences and legal consent.
//!
//! ## Stores
//!
//! Each feature is a reducer with its own state, actions and environment:
//!
//! - [`catalog`]: product listing, filters, pagination, search suggestions
//! - [`category`]: category menu and slug resolution
//! - [`accounts`]: registration, activation, login, social sign-in, logout
//! - [`preferences`]: page size and theme
//! - [`legal`]: terms and privacy acceptance
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! ## Example: browse a category
//!
//! ```rust,ignore
//! use storefront::*;
//! use storefront_runtime::Store;
//!
//! let client = HttpClient::new(&config)?;
//! let env = CatalogEnvironment::new(client, navigator, config.clone());
//! let store = Store::new(CatalogState::new(12), CatalogReducer::new(), env);
//!
//! let scope = CatalogScope::from_slugs(&tree, &["women", "shoes"]).unwrap_or_default();
//! store.send(CatalogAction::Enter { scope, query: RouteQuery::parse("gender=women") }).await;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod accounts;
pub mod catalog;
pub mod category;
pub mod config;
pub mod constants;
pub mod error;
pub mod filters;
pub mod http;
pub mod legal;
pub mod models;
pub mod pagination;
pub mod preferences;
pub mod providers;
pub mod query;
pub mod slug;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-exports for convenience
pub use accounts::{AccountAction, AccountEnvironment, AccountReducer, AccountState};
pub use catalog::{
    CatalogAction, CatalogEnvironment, CatalogReducer, CatalogScope, CatalogState, ProductQuery,
};
pub use category::{
    CategoryAction, CategoryEnvironment, CategoryPath, CategoryReducer, CategoryState,
    CategoryTree,
};
pub use config::StorefrontConfig;
pub use error::{ApiError, Operation, StorageError, StorefrontError, user_message};
pub use filters::{FilterChange, FilterState, Gender};
pub use http::HttpClient;
pub use legal::{LegalAction, LegalDocument, LegalEnvironment, LegalReducer, LegalState};
pub use pagination::PaginationState;
pub use preferences::{
    PreferencesAction, PreferencesEnvironment, PreferencesReducer, PreferencesState, Theme,
};
pub use providers::{AccountApi, CatalogApi, Navigator, SocialAuthApi, Storage};
pub use query::{Ordering, RouteQuery, SortField};
pub use storage::{JsonFileStorage, MemoryStorage};
