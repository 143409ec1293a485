//! Storefront providers.
//!
//! Traits for every external collaborator the stores talk to: the REST
//! backend, the router and persistent key-value storage. Reducers depend
//! on these traits; [`crate::http::HttpClient`], [`crate::storage`] and the
//! mocks supply implementations.
//!
//! Async providers return `impl Future + Send` so effects can move a cloned
//! provider into a spawned task.

pub mod accounts;
pub mod catalog;
pub mod navigator;
pub mod storage;

pub use accounts::{AccountApi, SocialAuthApi};
pub use catalog::CatalogApi;
pub use navigator::{NavigationError, Navigator};
pub use storage::Storage;
