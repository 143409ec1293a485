//! User preferences store: page size and theme, persisted as JSON under
//! `user-preferences`.

use crate::constants::{DEFAULT_ITEMS_PER_PAGE, storage_keys};
use crate::error::StorageError;
use crate::pagination::is_valid_items_per_page;
use crate::providers::Storage;
use serde::{Deserialize, Serialize};
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, smallvec};

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light
    #[default]
    Light,
    /// Dark
    Dark,
}

/// Persisted preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesState {
    /// Preferred page size.
    pub items_per_page: u32,
    /// Preferred theme.
    #[serde(default)]
    pub theme: Theme,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            theme: Theme::Light,
        }
    }
}

/// Preference store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesAction {
    /// Read stored preferences.
    Load,
    /// Stored preferences were read (`None` when absent or unreadable).
    Loaded {
        /// Stored value.
        preferences: Option<PreferencesState>,
    },
    /// Change the page size; sizes outside the options are ignored.
    SetItemsPerPage {
        /// New size.
        count: u32,
    },
    /// Change the theme.
    SetTheme {
        /// New theme.
        theme: Theme,
    },
    /// Back to defaults.
    Reset,
}

/// Preference store dependencies.
#[derive(Debug, Clone)]
pub struct PreferencesEnvironment<S> {
    /// Persistent storage.
    pub storage: S,
}

impl<S> PreferencesEnvironment<S> {
    /// Wrap a storage.
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }
}

/// Reducer for [`PreferencesState`].
#[derive(Debug, Clone)]
pub struct PreferencesReducer<S> {
    _phantom: std::marker::PhantomData<S>,
}

impl<S> PreferencesReducer<S> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S> Default for PreferencesReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Stored preferences; absent or unreadable documents give `None`.
fn read(storage: &dyn Storage) -> Option<PreferencesState> {
    match storage.get(storage_keys::USER_PREFERENCES) {
        Ok(Some(json)) => serde_json::from_str::<PreferencesState>(&json)
            .map_err(|err| tracing::warn!(error = %err, "Ignoring unreadable preferences"))
            .ok(),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read preferences");
            None
        },
    }
}

/// Store `count` as the preferred page size, keeping the stored theme.
///
/// Used by listings that change page size outside the preference store.
///
/// # Errors
///
/// Returns [`StorageError`] if the document cannot be encoded or written.
pub fn save_items_per_page(storage: &dyn Storage, count: u32) -> Result<(), StorageError> {
    let preferences = PreferencesState {
        items_per_page: count,
        ..read(storage).unwrap_or_default()
    };
    let json = serde_json::to_string(&preferences)
        .map_err(|err| StorageError::Serialization(err.to_string()))?;
    storage.set(storage_keys::USER_PREFERENCES, &json)
}

fn save<S: Storage + Clone + 'static>(storage: &S, preferences: PreferencesState) -> Effect<PreferencesAction> {
    let storage = storage.clone();
    async_effect! {
        match serde_json::to_string(&preferences) {
            Ok(json) => {
                if let Err(err) = storage.set(storage_keys::USER_PREFERENCES, &json) {
                    tracing::warn!(error = %err, "Failed to save preferences");
                }
            },
            Err(err) => tracing::warn!(error = %err, "Failed to encode preferences"),
        }
        None
    }
}

impl<S> Reducer for PreferencesReducer<S>
where
    S: Storage + Clone + 'static,
{
    type State = PreferencesState;
    type Action = PreferencesAction;
    type Environment = PreferencesEnvironment<S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PreferencesAction::Load => {
                let storage = env.storage.clone();
                smallvec![async_effect! {
                    let preferences = read(&storage);
                    Some(PreferencesAction::Loaded { preferences })
                }]
            },

            PreferencesAction::Loaded { preferences } => {
                let loaded = preferences.unwrap_or_default();
                state.theme = loaded.theme;
                state.items_per_page = if is_valid_items_per_page(loaded.items_per_page) {
                    loaded.items_per_page
                } else {
                    DEFAULT_ITEMS_PER_PAGE
                };
                smallvec![Effect::None]
            },

            PreferencesAction::SetItemsPerPage { count } => {
                if !is_valid_items_per_page(count) {
                    tracing::warn!(count, "Unsupported page size ignored");
                    return smallvec![Effect::None];
                }
                state.items_per_page = count;
                smallvec![save(&env.storage, *state)]
            },

            PreferencesAction::SetTheme { theme } => {
                state.theme = theme;
                smallvec![save(&env.storage, *state)]
            },

            PreferencesAction::Reset => {
                *state = PreferencesState::default();
                smallvec![save(&env.storage, *state)]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use storefront_testing::{ReducerTest, assertions, resolve_effects};

    type TestReducer = PreferencesReducer<MemoryStorage>;

    #[test]
    fn persisted_shape_is_camel_case() {
        let json = serde_json::to_string(&PreferencesState {
            items_per_page: 16,
            theme: Theme::Dark,
        })
        .unwrap();
        assert_eq!(json, r#"{"itemsPerPage":16,"theme":"dark"}"#);
    }

    #[test]
    fn invalid_page_size_is_ignored() {
        ReducerTest::new(TestReducer::new())
            .with_env(PreferencesEnvironment::new(MemoryStorage::new()))
            .given_state(PreferencesState::default())
            .when_action(PreferencesAction::SetItemsPerPage { count: 10 })
            .then_state(|state| assert_eq!(state.items_per_page, 12))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn loaded_out_of_range_size_falls_back() {
        ReducerTest::new(TestReducer::new())
            .with_env(PreferencesEnvironment::new(MemoryStorage::new()))
            .given_state(PreferencesState::default())
            .when_action(PreferencesAction::Loaded {
                preferences: Some(PreferencesState {
                    items_per_page: 99,
                    theme: Theme::Dark,
                }),
            })
            .then_state(|state| {
                assert_eq!(state.items_per_page, 12);
                assert_eq!(state.theme, Theme::Dark);
            })
            .run();
    }

    #[tokio::test]
    async fn changes_are_saved_and_reloaded() {
        let storage = MemoryStorage::new();
        let env = PreferencesEnvironment::new(storage.clone());
        let reducer = TestReducer::new();
        let mut state = PreferencesState::default();

        let effects = reducer.reduce(&mut state, PreferencesAction::SetItemsPerPage { count: 20 }, &env);
        resolve_effects(effects.into_vec()).await;
        let effects = reducer.reduce(&mut state, PreferencesAction::SetTheme { theme: Theme::Dark }, &env);
        resolve_effects(effects.into_vec()).await;

        let effects = reducer.reduce(&mut state, PreferencesAction::Load, &env);
        let actions = resolve_effects(effects.into_vec()).await;
        assert_eq!(
            actions,
            vec![PreferencesAction::Loaded {
                preferences: Some(PreferencesState {
                    items_per_page: 20,
                    theme: Theme::Dark,
                }),
            }]
        );
        assert!(storage.get(storage_keys::USER_PREFERENCES).unwrap().is_some());
    }

    #[test]
    fn page_size_save_keeps_theme() {
        let storage = MemoryStorage::new();
        storage
            .set(storage_keys::USER_PREFERENCES, r#"{"itemsPerPage":8,"theme":"dark"}"#)
            .unwrap();

        save_items_per_page(&storage, 20).unwrap();

        assert_eq!(
            read(&storage),
            Some(PreferencesState {
                items_per_page: 20,
                theme: Theme::Dark,
            })
        );
    }
}
