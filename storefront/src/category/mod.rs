//! Category hierarchy: the slug-addressable tree and the store that loads it.

pub mod store;
pub mod tree;

pub use store::{CategoryAction, CategoryEnvironment, CategoryReducer, CategoryState};
pub use tree::{Breadcrumb, CategoryId, CategoryNode, CategoryPath, CategoryTree};
