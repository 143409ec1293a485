//! # Storefront Core
//!
//! Reducer, effect and environment abstractions shared by every storefront
//! store (catalog, categories, accounts, preferences, legal).
//!
//! ## Core Concepts
//!
//! - **State**: The slice of client state a store owns
//! - **Action**: All inputs to a store (user intents and fetch results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of I/O (HTTP calls, URL pushes, storage writes)
//! - **Environment**: Injected collaborators (API client, navigator, storage, clock)
//!
//! Reducers never perform I/O themselves. A fetch is described as an
//! [`effect::Effect::Future`] whose output action is fed back into the same
//! store by the runtime.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for PreferencesReducer {
//!     type State = PreferencesState;
//!     type Action = PreferencesAction;
//!     type Environment = PreferencesEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PreferencesState,
//!         action: PreferencesAction,
//!         env: &PreferencesEnvironment,
//!     ) -> SmallVec<[Effect<PreferencesAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use smallvec::{SmallVec, smallvec};

/// Declarative helpers for building effects
pub mod effect_macros;

/// Reducer module - the trait every store's business logic implements
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for store logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state slice this reducer mutates
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected collaborators this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations update `state` in place and return descriptions of
        /// the I/O to perform. They must not block or await.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. The runtime interprets them and feeds
/// any produced action back into the store.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another, each finishing (including its
        /// feedback action) before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action after a delay (debouncing)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Futures are opaque, so Debug is written by hand
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Delay { .. } | Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - dependency injection traits shared across stores
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time for read-time gating and timestamps
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock implementation used outside tests
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};
    use std::time::Duration;

    #[test]
    fn nested_noops_are_none() {
        let effect: Effect<()> = Effect::merge(vec![
            Effect::None,
            Effect::chain(vec![Effect::None, Effect::None]),
        ]);
        assert!(effect.is_none());
    }

    #[test]
    fn delay_is_not_none() {
        let effect = Effect::chain(vec![
            Effect::None,
            Effect::Delay {
                duration: Duration::from_millis(10),
                action: Box::new(()),
            },
        ]);
        assert!(!effect.is_none());
    }

    #[test]
    fn debug_hides_future_body() {
        let effect: Effect<()> = Effect::Future(Box::pin(async { None }));
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
