//! # Storefront Testing
//!
//! Testing utilities for storefront reducers and stores.
//!
//! This crate provides:
//! - A controllable clock ([`FixedClock`])
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Effect assertions and an effect resolver that runs effect futures
//!   inline, so reducer tests can follow the feedback loop by hand
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(PreferencesReducer::new())
//!     .with_env(test_environment())
//!     .given_state(PreferencesState::default())
//!     .when_action(PreferencesAction::SetItemsPerPage { count: 16 })
//!     .then_state(|state| assert_eq!(state.items_per_page, 16))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use storefront_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions, resolve_effects};

/// Mock implementations of environment traits
pub mod mocks {
    use super::{Arc, Clock, DateTime, Duration, Mutex, Utc};

    /// Clock that only moves when told to
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let before = clock.now();
    /// clock.advance(Duration::seconds(3));
    /// assert_eq!(clock.now() - before, Duration::seconds(3));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock at the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward; clones share the same time
        pub fn advance(&self, by: Duration) {
            if let Ok(mut time) = self.time.lock() {
                *time += by;
            }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .lock()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089))
    }
}

/// Install a test-friendly tracing subscriber (idempotent)
///
/// Honours `RUST_LOG`; output goes through the test harness writer so it
/// only shows for failing tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub use mocks::{FixedClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_clones_share_time() {
        let clock = test_clock();
        let other = clock.clone();
        clock.advance(Duration::milliseconds(2500));
        assert_eq!(other.now() - test_clock().now(), Duration::milliseconds(2500));
    }

    #[test]
    fn test_tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
