//! Account store dependencies.

/// Collaborators of the account store.
#[derive(Debug, Clone)]
pub struct AccountEnvironment<A, S> {
    /// Account and social sign-in API.
    pub api: A,
    /// Persistent storage for tokens and user fields.
    pub storage: S,
}

impl<A, S> AccountEnvironment<A, S> {
    /// Bundle the collaborators.
    #[must_use]
    pub const fn new(api: A, storage: S) -> Self {
        Self { api, storage }
    }
}
