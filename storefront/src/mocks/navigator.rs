//! Recording navigator.

use crate::providers::{NavigationError, Navigator};
use crate::query::RouteQuery;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Navigator that records every pushed query.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pushes: Arc<Mutex<Vec<RouteQuery>>>,
    refuse: Arc<Mutex<bool>>,
}

impl RecordingNavigator {
    /// Create an empty navigator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make later pushes fail (they are still recorded).
    pub fn refuse_pushes(&self, refuse: bool) {
        if let Ok(mut guard) = self.refuse.lock() {
            *guard = refuse;
        }
    }

    /// Every pushed query, oldest first.
    #[must_use]
    pub fn pushes(&self) -> Vec<RouteQuery> {
        self.pushes.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Most recent push.
    #[must_use]
    pub fn last_push(&self) -> Option<RouteQuery> {
        self.pushes().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, query: &RouteQuery) -> impl Future<Output = Result<(), NavigationError>> + Send {
        let pushes = Arc::clone(&self.pushes);
        let refuse = Arc::clone(&self.refuse);
        let query = query.clone();

        async move {
            pushes
                .lock()
                .map_err(|_| NavigationError("Mutex lock failed".to_string()))?
                .push(query);
            let refused = refuse
                .lock()
                .map_err(|_| NavigationError("Mutex lock failed".to_string()))?;
            if *refused {
                return Err(NavigationError("navigation refused".to_string()));
            }
            Ok(())
        }
    }
}
