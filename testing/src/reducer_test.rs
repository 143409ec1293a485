//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use futures::future::BoxFuture;
use storefront_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// ReducerTest::new(CatalogReducer::new())
///     .with_env(env)
///     .given_state(CatalogState::default())
///     .when_action(CatalogAction::SetPage { page: 3 })
///     .then_state(|state| assert_eq!(state.pagination.current_page, 3))
///     .then_effects(|effects| assertions::assert_has_future_effect(effects))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    actions: Vec<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            actions: Vec::new(),
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Apply an action before the one under test (Given)
    ///
    /// Effects returned for setup actions are discarded.
    #[must_use]
    pub fn given_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Set the action to test (When)
    ///
    /// The effects of this last action are the ones checked by
    /// [`ReducerTest::then_effects`].
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        assert!(
            !self.actions.is_empty(),
            "Action must be set with when_action()"
        );

        let mut effects = Vec::new();
        for action in self.actions {
            effects = self.reducer.reduce(&mut state, action, &env).into_vec();
        }

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Run effects inline and collect the actions they produce
///
/// `Future` effects are awaited, `Delay` effects yield their action without
/// sleeping, and `Parallel`/`Sequential` effects are walked in order. Actions
/// are not fed back into any reducer.
pub fn resolve_effects<A>(effects: Vec<Effect<A>>) -> BoxFuture<'static, Vec<A>>
where
    A: Send + 'static,
{
    Box::pin(async move {
        let mut actions = Vec::new();
        for effect in effects {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => actions.extend(fut.await),
                Effect::Delay { action, .. } => actions.push(*action),
                Effect::Parallel(nested) | Effect::Sequential(nested) => {
                    actions.extend(resolve_effects(nested).await);
                },
            }
        }
        actions
    })
}

/// Helper assertions for effects
pub mod assertions {
    use storefront_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect does something.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect, at any depth
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        fn has_future<A>(effect: &Effect<A>) -> bool {
            match effect {
                Effect::Future(_) => true,
                Effect::Parallel(nested) | Effect::Sequential(nested) => {
                    nested.iter().any(has_future)
                },
                Effect::None | Effect::Delay { .. } => false,
            }
        }

        assert!(
            effects.iter().any(has_future),
            "Expected at least one Future effect, but none found"
        );
    }

    /// Assert that effects contain a Delay effect at the top level
    ///
    /// # Panics
    ///
    /// Panics if no Delay effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Delay { .. })),
            "Expected a Delay effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{SmallVec, async_effect, smallvec};

    #[derive(Clone, Debug, PartialEq)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        Fetch,
        Fetched(i32),
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.count -= 1;
                    smallvec![Effect::None]
                },
                TestAction::Fetch => smallvec![Effect::chain(vec![
                    async_effect! { Some(TestAction::Fetched(1)) },
                    async_effect! { Some(TestAction::Fetched(2)) },
                ])],
                TestAction::Fetched(value) => {
                    state.count = value;
                    smallvec![Effect::None]
                },
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_given_actions_apply_before_when() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 5 })
            .given_action(TestAction::Increment)
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 5);
            })
            .run();
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<TestAction>::None], 1);
        assertions::assert_effects_count::<TestAction>(&[], 0);
        assertions::assert_no_effects::<TestAction>(&[]);
    }

    #[tokio::test]
    async fn test_resolve_effects_walks_nested_effects() {
        let mut state = TestState { count: 0 };
        let effects = TestReducer.reduce(&mut state, TestAction::Fetch, &TestEnv);
        assertions::assert_has_future_effect(&effects);

        let actions = resolve_effects(effects.into_vec()).await;
        assert_eq!(actions, vec![TestAction::Fetched(1), TestAction::Fetched(2)]);
    }
}
