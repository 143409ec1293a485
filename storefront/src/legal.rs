//! Terms and privacy acceptance.
//!
//! A document can only be accepted once it was scrolled to the bottom and
//! has been open for at least [`LEGAL_MIN_READ_TIME_MS`]. Acceptance flags
//! are persisted (`termsAccepted`, `privacyAcknowledged`).

use crate::constants::{LEGAL_MIN_READ_TIME_MS, storage_keys};
use crate::providers::Storage;
use chrono::{DateTime, Duration, Utc};
use storefront_core::effect::Effect;
use storefront_core::environment::Clock;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, smallvec};

/// Legal documents shown before registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalDocument {
    /// Terms of service.
    Terms,
    /// Privacy policy.
    Privacy,
}

impl LegalDocument {
    /// Storage key of the acceptance flag.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Terms => storage_keys::TERMS_ACCEPTED,
            Self::Privacy => storage_keys::PRIVACY_ACKNOWLEDGED,
        }
    }
}

/// Reading progress of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    /// When the document was last opened.
    pub opened_at: Option<DateTime<Utc>>,
    /// Whether the reader reached the end.
    pub scrolled_to_bottom: bool,
    /// Whether the document was accepted.
    pub accepted: bool,
    /// Whether the dialog is shown.
    pub dialog_open: bool,
}

impl DocumentState {
    /// Time since opening (zero if never opened).
    #[must_use]
    pub fn time_spent(&self, now: DateTime<Utc>) -> Duration {
        self.opened_at
            .map_or_else(Duration::zero, |opened| now - opened)
    }

    /// Whether the document may be accepted at `now`.
    #[must_use]
    pub fn can_accept(&self, now: DateTime<Utc>) -> bool {
        self.scrolled_to_bottom
            && self.opened_at.is_some()
            && self.time_spent(now) >= Duration::milliseconds(LEGAL_MIN_READ_TIME_MS)
    }
}

/// Both documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalState {
    /// Terms of service.
    pub terms: DocumentState,
    /// Privacy policy.
    pub privacy: DocumentState,
}

impl LegalState {
    /// State of `document`.
    #[must_use]
    pub const fn document(&self, document: LegalDocument) -> &DocumentState {
        match document {
            LegalDocument::Terms => &self.terms,
            LegalDocument::Privacy => &self.privacy,
        }
    }

    const fn document_mut(&mut self, document: LegalDocument) -> &mut DocumentState {
        match document {
            LegalDocument::Terms => &mut self.terms,
            LegalDocument::Privacy => &mut self.privacy,
        }
    }

    /// Whether both documents were accepted.
    #[must_use]
    pub const fn has_read_both(&self) -> bool {
        self.terms.accepted && self.privacy.accepted
    }
}

/// Legal store actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegalAction {
    /// Read persisted acceptance flags.
    Load,
    /// Flags were read.
    Loaded {
        /// Terms accepted earlier.
        terms_accepted: bool,
        /// Privacy acknowledged earlier.
        privacy_acknowledged: bool,
    },
    /// Show a document and start its read timer.
    OpenDocument {
        /// Document.
        document: LegalDocument,
    },
    /// Hide a document.
    CloseDocument {
        /// Document.
        document: LegalDocument,
    },
    /// The reader reached the end of a document.
    ScrolledToBottom {
        /// Document.
        document: LegalDocument,
    },
    /// Accept a document; ignored until it can be accepted.
    Accept {
        /// Document.
        document: LegalDocument,
    },
    /// Forget progress and acceptance.
    Reset,
}

/// Legal store dependencies.
#[derive(Debug, Clone)]
pub struct LegalEnvironment<S, C> {
    /// Persistent storage.
    pub storage: S,
    /// Time source for read timers.
    pub clock: C,
}

impl<S, C> LegalEnvironment<S, C> {
    /// Bundle the collaborators.
    #[must_use]
    pub const fn new(storage: S, clock: C) -> Self {
        Self { storage, clock }
    }
}

/// Reducer for [`LegalState`].
#[derive(Debug, Clone)]
pub struct LegalReducer<S, C> {
    _phantom: std::marker::PhantomData<(S, C)>,
}

impl<S, C> LegalReducer<S, C> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S, C> Default for LegalReducer<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> Reducer for LegalReducer<S, C>
where
    S: Storage + Clone + 'static,
    C: Clock,
{
    type State = LegalState;
    type Action = LegalAction;
    type Environment = LegalEnvironment<S, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LegalAction::Load => {
                let storage = env.storage.clone();
                smallvec![async_effect! {
                    let flag = |document: LegalDocument| {
                        storage
                            .get(document.storage_key())
                            .map_err(|err| tracing::warn!(error = %err, "Failed to read legal flag"))
                            .ok()
                            .flatten()
                            .is_some_and(|value| value == "true")
                    };
                    Some(LegalAction::Loaded {
                        terms_accepted: flag(LegalDocument::Terms),
                        privacy_acknowledged: flag(LegalDocument::Privacy),
                    })
                }]
            },

            LegalAction::Loaded {
                terms_accepted,
                privacy_acknowledged,
            } => {
                state.terms.accepted = terms_accepted;
                state.privacy.accepted = privacy_acknowledged;
                smallvec![Effect::None]
            },

            LegalAction::OpenDocument { document } => {
                let doc = state.document_mut(document);
                doc.opened_at = Some(env.clock.now());
                doc.scrolled_to_bottom = false;
                doc.dialog_open = true;
                smallvec![Effect::None]
            },

            LegalAction::CloseDocument { document } => {
                state.document_mut(document).dialog_open = false;
                smallvec![Effect::None]
            },

            LegalAction::ScrolledToBottom { document } => {
                state.document_mut(document).scrolled_to_bottom = true;
                smallvec![Effect::None]
            },

            LegalAction::Accept { document } => {
                let now = env.clock.now();
                let doc = state.document_mut(document);
                if !doc.can_accept(now) {
                    tracing::debug!(
                        ?document,
                        scrolled = doc.scrolled_to_bottom,
                        spent_ms = doc.time_spent(now).num_milliseconds(),
                        "Document not read yet"
                    );
                    return smallvec![Effect::None];
                }
                doc.accepted = true;

                let storage = env.storage.clone();
                smallvec![async_effect! {
                    if let Err(err) = storage.set(document.storage_key(), "true") {
                        tracing::warn!(error = %err, "Failed to persist legal acceptance");
                    }
                    None
                }]
            },

            LegalAction::Reset => {
                *state = LegalState::default();
                let storage = env.storage.clone();
                smallvec![async_effect! {
                    for document in [LegalDocument::Terms, LegalDocument::Privacy] {
                        if let Err(err) = storage.remove(document.storage_key()) {
                            tracing::warn!(error = %err, "Failed to clear legal flag");
                        }
                    }
                    None
                }]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use storefront_testing::{FixedClock, resolve_effects, test_clock};

    type TestReducer = LegalReducer<MemoryStorage, FixedClock>;

    fn setup() -> (TestReducer, LegalEnvironment<MemoryStorage, FixedClock>, FixedClock, MemoryStorage) {
        let clock = test_clock();
        let storage = MemoryStorage::new();
        let env = LegalEnvironment::new(storage.clone(), clock.clone());
        (TestReducer::new(), env, clock, storage)
    }

    #[test]
    fn accept_requires_scroll_and_read_time() {
        let (reducer, env, clock, _) = setup();
        let mut state = LegalState::default();

        reducer.reduce(&mut state, LegalAction::OpenDocument { document: LegalDocument::Terms }, &env);
        reducer.reduce(&mut state, LegalAction::ScrolledToBottom { document: LegalDocument::Terms }, &env);
        clock.advance(Duration::milliseconds(1500));
        reducer.reduce(&mut state, LegalAction::Accept { document: LegalDocument::Terms }, &env);
        assert!(!state.terms.accepted);

        clock.advance(Duration::milliseconds(500));
        reducer.reduce(&mut state, LegalAction::Accept { document: LegalDocument::Terms }, &env);
        assert!(state.terms.accepted);
        assert!(!state.has_read_both());
    }

    #[test]
    fn reopening_resets_scroll() {
        let (reducer, env, clock, _) = setup();
        let mut state = LegalState::default();

        reducer.reduce(&mut state, LegalAction::OpenDocument { document: LegalDocument::Privacy }, &env);
        reducer.reduce(&mut state, LegalAction::ScrolledToBottom { document: LegalDocument::Privacy }, &env);
        clock.advance(Duration::seconds(3));
        reducer.reduce(&mut state, LegalAction::OpenDocument { document: LegalDocument::Privacy }, &env);

        assert!(!state.privacy.can_accept(env.clock.now()));
        assert!(state.privacy.dialog_open);
    }

    #[tokio::test]
    async fn acceptance_is_persisted_and_restored() {
        let (reducer, env, clock, storage) = setup();
        let mut state = LegalState::default();

        for document in [LegalDocument::Terms, LegalDocument::Privacy] {
            reducer.reduce(&mut state, LegalAction::OpenDocument { document }, &env);
            reducer.reduce(&mut state, LegalAction::ScrolledToBottom { document }, &env);
        }
        clock.advance(Duration::seconds(2));
        for document in [LegalDocument::Terms, LegalDocument::Privacy] {
            let effects = reducer.reduce(&mut state, LegalAction::Accept { document }, &env);
            resolve_effects(effects.into_vec()).await;
        }
        assert!(state.has_read_both());
        assert_eq!(storage.get("termsAccepted").unwrap().as_deref(), Some("true"));

        let mut fresh = LegalState::default();
        let effects = reducer.reduce(&mut fresh, LegalAction::Load, &env);
        for action in resolve_effects(effects.into_vec()).await {
            reducer.reduce(&mut fresh, action, &env);
        }
        assert!(fresh.has_read_both());
    }
}
