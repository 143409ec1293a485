//! Account and session store.
//!
//! # Session lifecycle
//!
//! ```text
//! Uninitialized ──Initialize──▶ Authenticated    (refresh token stored)
//!                          └──▶ Unauthenticated  (nothing stored)
//! Unauthenticated ──Login / SocialAuthenticate──▶ Authenticated
//! Authenticated ──Logout──▶ LoggingOut ──▶ Unauthenticated
//! ```
//!
//! Logout always ends unauthenticated; a failed server call is only
//! reported through [`AccountState::logout_warning`].
//!
//! Registration, activation, resend, login, social sign-in and logout each
//! keep their own [`RequestState`] so one running request never blocks
//! another. Every finished request stores a uniform [`OperationResult`].

mod actions;
mod environment;
mod reducer;
mod state;

pub use actions::AccountAction;
pub use environment::AccountEnvironment;
pub use reducer::AccountReducer;
pub use state::{
    AccountSession, AccountState, OperationData, OperationResult, RequestState, SessionStatus,
};
