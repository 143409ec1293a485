//! Catalog coordinator reducer.

use super::{CatalogAction, CatalogEnvironment, CatalogState};
use crate::preferences::save_items_per_page;
use crate::providers::{CatalogApi, Navigator};
use crate::query::{RouteQuery, keys};
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, delay, smallvec};

/// Keys whose change alters the visible product page.
const LISTING_KEYS: [&str; 3] = [keys::PAGE, keys::ORDERING, keys::PER_PAGE];

/// Reducer for [`CatalogState`].
///
/// Generic over the catalog API and router so tests can inject mocks.
#[derive(Debug, Clone)]
pub struct CatalogReducer<C, N> {
    _phantom: std::marker::PhantomData<(C, N)>,
}

impl<C, N> CatalogReducer<C, N> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<C, N> Default for CatalogReducer<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, N> CatalogReducer<C, N>
where
    C: CatalogApi + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    /// Issue a request for the current page and mark it in flight.
    fn fetch_products(state: &mut CatalogState, env: &CatalogEnvironment<C, N>) -> Effect<CatalogAction> {
        state.generations.products += 1;
        state.loading = true;
        state.error = None;

        let generation = state.generations.products;
        let query = state.product_query();
        let api = env.api.clone();
        async_effect! {
            let page = query.page;
            let result = api.fetch_products(&query).await;
            Some(CatalogAction::ProductsLoaded { generation, page, result })
        }
    }

    /// Issue a request for the scope's filter options.
    fn fetch_filters(state: &mut CatalogState, env: &CatalogEnvironment<C, N>) -> Effect<CatalogAction> {
        state.generations.filters += 1;
        state.filters.filters_loading = true;
        state.filters.filters_error = None;

        let generation = state.generations.filters;
        let scope = state.scope;
        let search = {
            let search = state.filters.search_query.trim();
            (!search.is_empty()).then(|| search.to_string())
        };
        let api = env.api.clone();
        async_effect! {
            let result = api.fetch_filters(&scope, search.as_deref()).await;
            Some(CatalogAction::FiltersLoaded { generation, result })
        }
    }

    /// Push `query`; a refused navigation is logged and the fetch proceeds.
    fn push(query: RouteQuery, env: &CatalogEnvironment<C, N>) -> Effect<CatalogAction> {
        let navigator = env.navigator.clone();
        async_effect! {
            if let Err(err) = navigator.push(&query).await {
                tracing::warn!(error = %err, query = %query, "Route push failed");
            }
            None
        }
    }

    /// Record the canonical query, push it and fetch the current page.
    fn push_and_fetch(
        state: &mut CatalogState,
        env: &CatalogEnvironment<C, N>,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        state.query = state.canonical_query(env.config.default_items_per_page);
        let push = Self::push(state.query.clone(), env);
        let fetch = Self::fetch_products(state, env);
        smallvec![Effect::chain(vec![push, fetch])]
    }

    /// Same as [`Self::push_and_fetch`] with a filter refresh alongside the
    /// product fetch.
    fn refresh_all(
        state: &mut CatalogState,
        env: &CatalogEnvironment<C, N>,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        let filters = Self::fetch_filters(state, env);
        state.query = state.canonical_query(env.config.default_items_per_page);
        let push = Self::push(state.query.clone(), env);
        let fetch = Self::fetch_products(state, env);
        smallvec![Effect::chain(vec![push, Effect::merge(vec![filters, fetch])])]
    }

    /// Seed ordering and pagination from `query`; without `per_page` the
    /// current page size stays.
    fn load_listing_keys(state: &mut CatalogState, query: &RouteQuery) {
        state.ordering = query.ordering();
        if let Some(per_page) = query.per_page() {
            state.pagination.set_items_per_page(per_page);
        }
        state.pagination.current_page = query.page().unwrap_or(1);
        state.page_before_resize = None;
    }

    fn reset_suggestions(state: &mut CatalogState) {
        state.generations.suggestions += 1;
        state.suggestions.clear();
        state.suggestions_loading = false;
    }

    fn reject_during_sync(state: &CatalogState, what: &str) -> bool {
        if state.filters.is_updating_filters {
            tracing::warn!(action = what, "Filter edit ignored while syncing from URL");
            return true;
        }
        false
    }
}

impl<C, N> Reducer for CatalogReducer<C, N>
where
    C: CatalogApi + Clone + 'static,
    N: Navigator + Clone + 'static,
{
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = CatalogEnvironment<C, N>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Enter: URL → state, then filters and products together
            // ═══════════════════════════════════════════════════════════
            CatalogAction::Enter { scope, query } => {
                tracing::debug!(?scope, query = %query, "Entering catalog listing");

                state.scope = scope;
                state.filters.is_updating_filters = true;
                state.filters.load_from_query(&query);
                state.pagination.reset();
                Self::load_listing_keys(state, &query);
                state.query = query;
                state.products.clear();
                Self::reset_suggestions(state);

                let filters = Self::fetch_filters(state, env);
                let products = Self::fetch_products(state, env);
                smallvec![Effect::merge(vec![filters, products])]
            },

            CatalogAction::QueryChanged { query } => {
                if query == state.query {
                    return smallvec![Effect::None];
                }

                let filters_changed = state.query.differs_in(&query, &keys::FILTER_KEYS);
                let listing_changed = filters_changed || state.query.differs_in(&query, &LISTING_KEYS);
                tracing::debug!(query = %query, filters_changed, listing_changed, "Route query changed");

                if filters_changed {
                    state.filters.is_updating_filters = true;
                    state.filters.load_from_query(&query);
                }
                Self::load_listing_keys(state, &query);
                state.query = query;

                if filters_changed {
                    let filters = Self::fetch_filters(state, env);
                    let products = Self::fetch_products(state, env);
                    smallvec![Effect::merge(vec![filters, products])]
                } else if listing_changed {
                    smallvec![Self::fetch_products(state, env)]
                } else {
                    smallvec![Effect::None]
                }
            },

            CatalogAction::Leave => {
                let generations = state.generations.bumped();
                let per_page = state.pagination.items_per_page;
                *state = CatalogState::new(per_page);
                state.generations = generations;
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Filter edits: state → URL, page 1
            // ═══════════════════════════════════════════════════════════
            CatalogAction::SetFilter { change } => {
                if let Err(err) = state.filters.set_filter(change) {
                    tracing::warn!(error = %err, ?change, "Filter change rejected");
                    return smallvec![Effect::None];
                }
                tracing::debug!(?change, "Filter changed");

                state.pagination.set_page(1);
                state.page_before_resize = None;
                Self::push_and_fetch(state, env)
            },

            CatalogAction::ClearAllFilters => {
                if Self::reject_during_sync(state, "clear_all_filters") {
                    return smallvec![Effect::None];
                }

                let previous_search = state.filters.search_query.clone();
                state.filters.clear();
                if state.scope.is_category() {
                    state.filters.search_query = previous_search.clone();
                }
                let search_changed = previous_search != state.filters.search_query;

                let mut query = RouteQuery::new();
                if let Some(per_page) = state.query.get(keys::PER_PAGE) {
                    query.set(keys::PER_PAGE, per_page);
                }
                state.query = query;
                state.pagination.set_page(1);
                state.page_before_resize = None;

                if search_changed {
                    Self::refresh_all(state, env)
                } else {
                    Self::push_and_fetch(state, env)
                }
            },

            // ═══════════════════════════════════════════════════════════
            // Pagination and ordering
            // ═══════════════════════════════════════════════════════════
            CatalogAction::SetPage { page } => {
                let page = state.pagination.set_page(page);
                state.page_before_resize = None;
                tracing::debug!(page, "Page changed");
                Self::push_and_fetch(state, env)
            },

            CatalogAction::SetOrdering { ordering } => {
                state.ordering = ordering;
                state.pagination.set_page(1);
                state.page_before_resize = None;
                tracing::debug!(ordering = %ordering, "Ordering changed");
                Self::push_and_fetch(state, env)
            },

            CatalogAction::SetItemsPerPage { count } => {
                let previous_page = state.pagination.current_page;
                if !state.pagination.set_items_per_page(count) {
                    tracing::warn!(count, "Unsupported page size ignored");
                    return smallvec![Effect::None];
                }
                tracing::debug!(count, previous_page, "Page size changed");

                state.pagination.set_page(1);
                state.page_before_resize = (previous_page > 1).then_some(previous_page);
                state.query.set(keys::PER_PAGE, count.to_string());
                let mut effects = Self::push_and_fetch(state, env);
                if let Some(storage) = env.preferences.clone() {
                    effects.push(async_effect! {
                        if let Err(err) = save_items_per_page(storage.as_ref(), count) {
                            tracing::warn!(error = %err, count, "Failed to remember page size");
                        }
                        None
                    });
                }
                effects
            },

            // ═══════════════════════════════════════════════════════════
            // Search
            // ═══════════════════════════════════════════════════════════
            CatalogAction::SetSearch { query } => {
                if Self::reject_during_sync(state, "set_search") {
                    return smallvec![Effect::None];
                }
                state.filters.set_search(&query);
                state.suggestion_input = state.filters.search_query.clone();
                Self::reset_suggestions(state);
                state.pagination.set_page(1);
                state.page_before_resize = None;
                tracing::debug!(search = %state.filters.search_query, "Search submitted");
                Self::refresh_all(state, env)
            },

            CatalogAction::ClearSearch => {
                if Self::reject_during_sync(state, "clear_search") {
                    return smallvec![Effect::None];
                }
                state.filters.clear_search();
                state.suggestion_input.clear();
                Self::reset_suggestions(state);
                state.pagination.set_page(1);
                state.page_before_resize = None;
                Self::refresh_all(state, env)
            },

            CatalogAction::ToggleFilterDrawer { open } => {
                state.filters.toggle_drawer(open);
                smallvec![Effect::None]
            },

            CatalogAction::SearchInputChanged { input } => {
                Self::reset_suggestions(state);
                let long_enough = input.trim().chars().count() >= env.config.suggestion_min_chars;
                state.suggestion_input = input;
                if !long_enough {
                    return smallvec![Effect::None];
                }

                let generation = state.generations.suggestions;
                smallvec![delay! {
                    duration: env.config.search_debounce,
                    action: CatalogAction::SuggestionsDebounced { generation }
                }]
            },

            // ═══════════════════════════════════════════════════════════
            // Effect results
            // ═══════════════════════════════════════════════════════════
            CatalogAction::SuggestionsDebounced { generation } => {
                if generation != state.generations.suggestions {
                    return smallvec![Effect::None];
                }
                state.suggestions_loading = true;

                let input = state.suggestion_input.trim().to_string();
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.fetch_suggestions(&input).await;
                    Some(CatalogAction::SuggestionsLoaded { generation, result })
                }]
            },

            CatalogAction::SuggestionsLoaded { generation, result } => {
                if generation != state.generations.suggestions {
                    tracing::debug!(generation, "Discarding stale suggestions");
                    return smallvec![Effect::None];
                }
                state.suggestions_loading = false;
                state.suggestions = match result {
                    Ok(suggestions) => suggestions,
                    Err(err) => {
                        tracing::warn!(status = err.status, "Suggestions failed to load");
                        Vec::new()
                    },
                };
                smallvec![Effect::None]
            },

            CatalogAction::FiltersLoaded { generation, result } => {
                if generation != state.generations.filters {
                    tracing::warn!(generation, current = state.generations.filters, "Discarding stale filters");
                    return smallvec![Effect::None];
                }
                state.filters.filters_loading = false;
                match result {
                    Ok(available) => {
                        state.filters.set_available(Some(available));
                    },
                    Err(err) => {
                        tracing::warn!(status = err.status, "Available filters failed to load");
                        state.filters.set_available(None);
                        state.filters.filters_error = Some(err);
                    },
                }
                smallvec![Effect::None]
            },

            CatalogAction::ProductsLoaded {
                generation,
                page,
                result,
            } => {
                if generation != state.generations.products {
                    tracing::warn!(generation, current = state.generations.products, "Discarding stale products");
                    return smallvec![Effect::None];
                }
                state.loading = false;
                state.filters.is_updating_filters = false;
                let wanted_page = state.page_before_resize.take().unwrap_or(page);

                let loaded = match result {
                    Ok(loaded) => loaded,
                    Err(err) => {
                        tracing::warn!(status = err.status, page, "Product page failed to load");
                        state.products.clear();
                        state.pagination.total_pages = 0;
                        state.pagination.total_items = 0;
                        state.error = Some(err);
                        return smallvec![Effect::None];
                    },
                };

                state.products = loaded.products;
                state
                    .pagination
                    .apply_totals(page, loaded.total_pages, loaded.total_items);
                tracing::debug!(
                    page,
                    total_pages = loaded.total_pages,
                    total_items = loaded.total_items,
                    "Product page loaded"
                );

                let last = state.pagination.total_pages;
                if last > 0 && wanted_page > last {
                    tracing::debug!(wanted_page, last, "Correcting page past the end");
                    state.pagination.current_page = last;
                    return Self::push_and_fetch(state, env);
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
    use crate::catalog::CatalogScope;
    use crate::config::StorefrontConfig;
    use crate::error::ApiError;
    use crate::filters::{FilterChange, Gender};
    use crate::mocks::{MockCatalogApi, RecordingNavigator};
    use crate::models::{AvailableFilters, ProductPage, YearRange};
    use crate::query::{Ordering, SortField};
    use storefront_testing::{ReducerTest, assertions};

    type TestReducer = CatalogReducer<MockCatalogApi, RecordingNavigator>;
    type TestEnv = CatalogEnvironment<MockCatalogApi, RecordingNavigator>;

    fn env() -> TestEnv {
        CatalogEnvironment::new(
            MockCatalogApi::new(),
            RecordingNavigator::new(),
            StorefrontConfig::default(),
        )
    }

    fn page(total_pages: u32, total_items: u64) -> ProductPage {
        ProductPage {
            total_pages,
            total_items,
            ..ProductPage::default()
        }
    }

    fn loaded_state() -> CatalogState {
        let mut state = CatalogState::default();
        state.filters.available = AvailableFilters {
            gender: None,
            year: Some(YearRange { min: 2010, max: 2023 }),
        };
        state.pagination.apply_totals(5, 8, 90);
        state.query = RouteQuery::parse("page=5");
        state
    }

    #[test]
    fn enter_seeds_state_and_raises_guard() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::Enter {
                scope: CatalogScope::All,
                query: RouteQuery::parse("gender=women&min_year=2020&page=2&ordering=year&per_page=20"),
            })
            .then_state(|state| {
                assert!(state.filters.is_updating_filters);
                assert_eq!(state.filters.gender, Some(Gender::Women));
                assert_eq!(state.filters.min_year, Some(2020));
                assert_eq!(state.pagination.current_page, 2);
                assert_eq!(state.pagination.items_per_page, 20);
                assert_eq!(state.ordering, Ordering::ascending(SortField::Year));
                assert!(state.loading);
                assert!(state.filters.filters_loading);
                assert_eq!(state.generations.products, 1);
                assert_eq!(state.generations.filters, 1);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert!(matches!(&effects[0], Effect::Parallel(fetches) if fetches.len() == 2));
            })
            .run();
    }

    #[test]
    fn products_loaded_releases_guard() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::default())
            .given_action(CatalogAction::Enter {
                scope: CatalogScope::All,
                query: RouteQuery::new(),
            })
            .when_action(CatalogAction::ProductsLoaded {
                generation: 1,
                page: 1,
                result: Ok(page(3, 30)),
            })
            .then_state(|state| {
                assert!(!state.filters.is_updating_filters);
                assert!(!state.loading);
                assert_eq!(state.pagination.total_pages, 3);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn stale_products_are_dropped() {
        let mut state = CatalogState::default();
        state.generations.products = 4;
        state.loading = true;

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::ProductsLoaded {
                generation: 3,
                page: 1,
                result: Ok(page(9, 100)),
            })
            .then_state(|state| {
                assert!(state.loading);
                assert_eq!(state.pagination.total_pages, 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn filter_change_resets_page_and_keeps_per_page() {
        let mut state = loaded_state();
        state.query = RouteQuery::parse("page=5&per_page=16");
        state.pagination.items_per_page = 16;

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::SetFilter {
                change: FilterChange::Gender(Some(Gender::Men)),
            })
            .then_state(|state| {
                assert_eq!(state.pagination.current_page, 1);
                assert_eq!(state.query.to_query_string(), "gender=men&per_page=16");
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn rejected_filter_change_does_nothing() {
        let mut state = loaded_state();
        state.filters.min_year = Some(2020);

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::SetFilter {
                change: FilterChange::MaxYear(Some(2015)),
            })
            .then_state(|state| {
                assert_eq!(state.filters.max_year, None);
                assert_eq!(state.pagination.current_page, 5);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn set_page_clamps_to_last() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(CatalogAction::SetPage { page: 42 })
            .then_state(|state| {
                assert_eq!(state.pagination.current_page, 8);
                assert_eq!(state.query.get("page"), Some("8"));
            })
            .run();
    }

    #[test]
    fn default_ordering_is_omitted() {
        let mut state = loaded_state();
        state.ordering = Ordering::ascending(SortField::Year);
        state.query = RouteQuery::parse("ordering=year&page=5");

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::SetOrdering {
                ordering: Ordering::default(),
            })
            .then_state(|state| {
                assert!(state.query.is_empty());
                assert_eq!(state.pagination.current_page, 1);
            })
            .run();
    }

    #[test]
    fn resize_corrects_page_after_load() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .given_action(CatalogAction::SetItemsPerPage { count: 16 })
            .when_action(CatalogAction::ProductsLoaded {
                generation: 1,
                page: 1,
                result: Ok(page(3, 40)),
            })
            .then_state(|state| {
                assert_eq!(state.pagination.current_page, 3);
                assert_eq!(state.pagination.items_per_page, 16);
                assert_eq!(state.query.get("per_page"), Some("16"));
                assert_eq!(state.query.get("page"), Some("3"));
                assert!(state.loading);
                assert_eq!(state.generations.products, 2);
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn invalid_page_size_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(CatalogAction::SetItemsPerPage { count: 13 })
            .then_state(|state| assert_eq!(state.pagination.items_per_page, 12))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failed_products_clear_list() {
        let mut state = loaded_state();
        state.generations.products = 1;
        state.products = vec![crate::models::Product {
            product_id: 1,
            gender: "Men".into(),
            year: 2012,
            product_display_name: "Blue Tee".into(),
            image_url: String::new(),
        }];

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::ProductsLoaded {
                generation: 1,
                page: 1,
                result: Err(ApiError::new(500)),
            })
            .then_state(|state| {
                assert!(state.products.is_empty());
                assert_eq!(state.error.as_ref().map(|e| e.status), Some(500));
                assert!(!state.pagination.has_items());
            })
            .run();
    }

    #[test]
    fn failed_filters_become_neutral() {
        let mut state = loaded_state();
        state.generations.filters = 2;

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::FiltersLoaded {
                generation: 2,
                result: Err(ApiError::network()),
            })
            .then_state(|state| {
                assert!(state.filters.available.is_neutral());
                assert!(state.filters.filters_error.is_some());
                assert!(!state.filters.filters_loading);
            })
            .run();
    }

    #[test]
    fn short_input_clears_suggestions_without_request() {
        let mut state = CatalogState::default();
        state.suggestions = vec!["Shirt".into()];

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::SearchInputChanged { input: "s".into() })
            .then_state(|state| assert!(state.suggestions.is_empty()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn suggestions_are_debounced_and_fenced() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::default())
            .given_action(CatalogAction::SearchInputChanged { input: "sh".into() })
            .given_action(CatalogAction::SearchInputChanged { input: "shi".into() })
            .when_action(CatalogAction::SuggestionsDebounced { generation: 1 })
            .then_state(|state| assert!(!state.suggestions_loading))
            .then_effects(assertions::assert_no_effects)
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::default())
            .when_action(CatalogAction::SearchInputChanged { input: "shi".into() })
            .then_effects(|effects| assertions::assert_has_delay_effect(effects))
            .run();
    }

    #[test]
    fn clear_all_keeps_search_in_category_scope() {
        use crate::category::{CategoryId, CategoryPath};

        let mut state = loaded_state();
        state.scope = CatalogScope::Category(CategoryPath::master(CategoryId(2)));
        state.filters.gender = Some(Gender::Girls);
        state.filters.search_query = "dress".into();
        state.filters.is_filter_drawer_open = true;
        state.query = RouteQuery::parse("gender=girls&q=dress&page=5&per_page=20&utm=x");

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::ClearAllFilters)
            .then_state(|state| {
                assert_eq!(state.filters.gender, None);
                assert_eq!(state.filters.search_query, "dress");
                assert!(state.filters.is_filter_drawer_open);
                assert_eq!(state.query.to_query_string(), "per_page=20&q=dress");
            })
            .run();
    }

    #[test]
    fn unchanged_query_is_a_no_op() {
        let state = loaded_state();
        let query = state.query.clone();

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::QueryChanged { query })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn page_only_query_change_skips_filters() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(CatalogAction::QueryChanged {
                query: RouteQuery::parse("page=2"),
            })
            .then_state(|state| {
                assert!(!state.filters.filters_loading);
                assert!(!state.filters.is_updating_filters);
                assert_eq!(state.pagination.current_page, 2);
                assert!(state.loading);
            })
            .then_effects(|effects| {
                assert!(matches!(effects, [Effect::Future(_)]));
            })
            .run();
    }

    #[test]
    fn entry_without_per_page_keeps_page_size() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::new(16))
            .when_action(CatalogAction::Enter {
                scope: CatalogScope::All,
                query: RouteQuery::new(),
            })
            .then_state(|state| {
                assert_eq!(state.pagination.items_per_page, 16);
                assert_eq!(state.product_query().per_page, 16);
            })
            .run();
    }

    #[test]
    fn filter_keys_in_query_change_raise_guard_and_refresh_both() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(CatalogAction::QueryChanged {
                query: RouteQuery::parse("gender=women"),
            })
            .then_state(|state| {
                assert!(state.filters.is_updating_filters);
                assert_eq!(state.filters.gender, Some(Gender::Women));
                assert_eq!(state.pagination.current_page, 1);
                assert!(state.filters.filters_loading);
                assert!(state.loading);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert!(matches!(&effects[0], Effect::Parallel(fetches) if fetches.len() == 2));
            })
            .run();
    }

    #[test]
    fn search_refreshes_filters_and_products_from_first_page() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(loaded_state())
            .when_action(CatalogAction::SetSearch {
                query: "  dress ".into(),
            })
            .then_state(|state| {
                assert_eq!(state.filters.search_query, "dress");
                assert_eq!(state.suggestion_input, "dress");
                assert_eq!(state.pagination.current_page, 1);
                assert_eq!(state.query.to_query_string(), "q=dress");
                assert!(state.filters.filters_loading);
                assert!(state.loading);
                assert_eq!(state.product_query().search.as_deref(), Some("dress"));
            })
            .then_effects(|effects| {
                assert!(matches!(
                    &effects[0],
                    Effect::Sequential(steps)
                        if matches!(&steps[1], Effect::Parallel(fetches) if fetches.len() == 2)
                ));
            })
            .run();
    }

    #[test]
    fn clearing_search_drops_q_and_page() {
        let mut state = loaded_state();
        state.filters.gender = Some(Gender::Men);
        state.filters.search_query = "dress".into();
        state.query = RouteQuery::parse("gender=men&page=5&q=dress");

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::ClearSearch)
            .then_state(|state| {
                assert!(state.filters.search_query.is_empty());
                assert_eq!(state.pagination.current_page, 1);
                assert_eq!(state.query.to_query_string(), "gender=men");
                assert!(state.filters.filters_loading);
            })
            .run();
    }

    #[test]
    fn clear_all_drops_search_in_all_products() {
        let mut state = loaded_state();
        state.filters.gender = Some(Gender::Men);
        state.filters.search_query = "dress".into();
        state.ordering = Ordering::ascending(SortField::Year);
        state.query = RouteQuery::parse("gender=men&ordering=year&page=5&q=dress");

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CatalogAction::ClearAllFilters)
            .then_state(|state| {
                assert_eq!(state.filters.gender, None);
                assert!(state.filters.search_query.is_empty());
                assert_eq!(state.query.to_query_string(), "ordering=year");
                assert!(state.filters.filters_loading);
                assert_eq!(state.generations.filters, 1);
            })
            .run();
    }

    #[test]
    fn leave_discards_in_flight_results() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(CatalogState::new(20))
            .given_action(CatalogAction::Enter {
                scope: CatalogScope::All,
                query: RouteQuery::parse("gender=men"),
            })
            .given_action(CatalogAction::Leave)
            .when_action(CatalogAction::ProductsLoaded {
                generation: 1,
                page: 1,
                result: Ok(page(4, 70)),
            })
            .then_state(|state| {
                assert_eq!(state.generations.products, 2);
                assert_eq!(state.generations.filters, 2);
                assert_eq!(state.pagination.total_pages, 0);
                assert_eq!(state.pagination.items_per_page, 20);
                assert_eq!(state.filters.gender, None);
                assert!(!state.loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn page_size_change_is_remembered() {
        use crate::constants::storage_keys;
        use crate::providers::Storage;
        use crate::storage::MemoryStorage;

        let storage = MemoryStorage::new();
        let env = env().with_preferences(storage.clone());
        let mut state = loaded_state();

        let effects = TestReducer::new().reduce(
            &mut state,
            CatalogAction::SetItemsPerPage { count: 16 },
            &env,
        );
        storefront_testing::resolve_effects(effects.into_vec()).await;

        assert_eq!(
            storage.get(storage_keys::USER_PREFERENCES).unwrap().as_deref(),
            Some(r#"{"itemsPerPage":16,"theme":"light"}"#)
        );
    }
}
