//! Category menu store.
//!
//! Loads `GET /catalog/categories` once per [`CategoryAction::FetchMenu`]
//! and keeps the resulting [`CategoryTree`] for slug resolution.

use super::tree::CategoryTree;
use crate::error::ApiError;
use crate::models::CategoryMenu;
use crate::providers::CatalogApi;
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, smallvec};

const LOAD_FAILED: &str = "Failed to load categories";

/// Category menu state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryState {
    /// Loaded tree (empty until the first successful load).
    pub tree: CategoryTree,
    /// Request in flight.
    pub loading: bool,
    /// Last failure message.
    pub error: Option<String>,
}

impl CategoryState {
    /// Whether any category was loaded.
    #[must_use]
    pub fn has_categories(&self) -> bool {
        !self.tree.is_empty()
    }
}

/// Category store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryAction {
    /// Load the menu.
    FetchMenu,
    /// Menu request finished.
    MenuLoaded {
        /// Menu or failure.
        result: Result<CategoryMenu, ApiError>,
    },
}

/// Category store dependencies.
#[derive(Debug, Clone)]
pub struct CategoryEnvironment<C> {
    /// Catalog API.
    pub api: C,
}

impl<C> CategoryEnvironment<C> {
    /// Wrap a catalog API.
    #[must_use]
    pub const fn new(api: C) -> Self {
        Self { api }
    }
}

/// Reducer for [`CategoryState`].
#[derive(Debug, Clone)]
pub struct CategoryReducer<C> {
    _phantom: std::marker::PhantomData<C>,
}

impl<C> CategoryReducer<C> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C> Default for CategoryReducer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Reducer for CategoryReducer<C>
where
    C: CatalogApi + Clone + 'static,
{
    type State = CategoryState;
    type Action = CategoryAction;
    type Environment = CategoryEnvironment<C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CategoryAction::FetchMenu => {
                state.loading = true;
                state.error = None;

                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.fetch_categories().await;
                    Some(CategoryAction::MenuLoaded { result })
                }]
            },

            CategoryAction::MenuLoaded { result } => {
                state.loading = false;
                match result {
                    Ok(menu) => {
                        state.tree = CategoryTree::from_menu(menu);
                        tracing::debug!(masters = state.tree.masters().len(), "Category menu loaded");
                    },
                    Err(err) => {
                        tracing::warn!(status = err.status, "Category menu failed to load");
                        state.error = Some(err.message.unwrap_or_else(|| LOAD_FAILED.to_string()));
                    },
                }
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mocks::MockCatalogApi;
    use crate::models::MasterCategoryDto;
    use storefront_testing::{ReducerTest, assertions};

    type TestReducer = CategoryReducer<MockCatalogApi>;

    fn env() -> CategoryEnvironment<MockCatalogApi> {
        CategoryEnvironment::new(MockCatalogApi::new())
    }

    fn menu() -> CategoryMenu {
        CategoryMenu {
            categories: vec![MasterCategoryDto {
                id: 1,
                name: "Apparel".into(),
                description: None,
                sub_categories: vec![],
            }],
        }
    }

    #[test]
    fn fetch_sets_loading_and_requests() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CategoryState {
                error: Some("old".into()),
                ..CategoryState::default()
            })
            .when_action(CategoryAction::FetchMenu)
            .then_state(|state| {
                assert!(state.loading);
                assert!(state.error.is_none());
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn loaded_menu_builds_tree() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CategoryState {
                loading: true,
                ..CategoryState::default()
            })
            .when_action(CategoryAction::MenuLoaded { result: Ok(menu()) })
            .then_state(|state| {
                assert!(!state.loading);
                assert!(state.has_categories());
                assert!(state.tree.master_id_by_slug("apparel").is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failure_keeps_server_message_or_fallback() {
        let mut state = CategoryState::default();
        let reducer = TestReducer::new();
        let env = env();

        reducer.reduce(
            &mut state,
            CategoryAction::MenuLoaded {
                result: Err(ApiError::new(500)),
            },
            &env,
        );
        assert_eq!(state.error.as_deref(), Some(LOAD_FAILED));

        reducer.reduce(
            &mut state,
            CategoryAction::MenuLoaded {
                result: Err(ApiError::new(503).with_message("maintenance")),
            },
            &env,
        );
        assert_eq!(state.error.as_deref(), Some("maintenance"));
        assert!(!state.has_categories());
    }
}
