//! In-memory provider implementations for tests and demos.
//!
//! Each mock keeps its data behind `Arc<Mutex<_>>` so clones handed to a
//! store share state with the handle the test keeps for assertions.

pub mod accounts;
pub mod catalog;
pub mod navigator;

pub use accounts::MockAccountApi;
pub use catalog::MockCatalogApi;
pub use navigator::RecordingNavigator;

use crate::error::ApiError;
use std::sync::{Mutex, MutexGuard};

/// Lock a mock's data, mapping poisoning to a 500.
fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ApiError> {
    mutex
        .lock()
        .map_err(|_| ApiError::new(500).with_message("Mutex lock failed"))
}
