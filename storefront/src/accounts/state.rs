//! Account store state.

use crate::error::{ApiError, Operation, user_message};
use crate::models::{SocialAuthResponse, SocialProfile, TokenPair, User};

/// Credentials and user of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSession {
    /// Short-lived access token.
    pub access_token: Option<String>,
    /// Durable refresh token, persisted across reloads.
    pub refresh_token: Option<String>,
    /// Signed-in user once loaded.
    pub current_user: Option<User>,
    /// Whether a session is established.
    pub is_authenticated: bool,
    /// Whether stored credentials were checked.
    pub is_initialized: bool,
}

impl AccountSession {
    /// Forget credentials and user; stays initialized.
    pub fn clear(&mut self) {
        *self = Self {
            is_initialized: self.is_initialized,
            ..Self::default()
        };
    }

    /// Adopt a token pair.
    pub fn authenticate(&mut self, tokens: &TokenPair) {
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        self.is_authenticated = true;
        self.is_initialized = true;
    }
}

/// Derived session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Stored credentials not checked yet.
    Uninitialized,
    /// Signed in.
    Authenticated,
    /// Signed out.
    Unauthenticated,
    /// Logout request in flight.
    LoggingOut,
}

/// Payload of a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationData {
    /// Registered, activated or loaded user.
    User(User),
    /// Issued tokens.
    Tokens(TokenPair),
    /// Address an activation email was sent to.
    Email(String),
    /// Social sign-in outcome.
    Social(Box<SocialAuthResponse>),
    /// Nothing beyond the message.
    Empty,
}

/// Uniform outcome of an account operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    pub data: Option<OperationData>,
    /// Normalised error on failure.
    pub error: Option<ApiError>,
    /// Message for the user.
    pub message: String,
}

impl OperationResult {
    /// Success with the server message or `default_message`.
    #[must_use]
    pub fn ok(data: OperationData, server_message: Option<String>, default_message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: server_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_message.to_string()),
        }
    }

    /// Failure with the message for `operation`.
    #[must_use]
    pub fn failed(operation: Operation, error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            message: user_message(operation, Some(&error)),
            error: Some(error),
        }
    }
}

/// Flags of one request kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// In flight.
    pub loading: bool,
    /// Last request succeeded.
    pub success: bool,
    /// Last failure.
    pub error: Option<ApiError>,
    /// Last outcome.
    pub result: Option<OperationResult>,
}

impl RequestState {
    /// Mark a new request in flight.
    pub fn start(&mut self) {
        *self = Self {
            loading: true,
            ..Self::default()
        };
    }

    /// Record an outcome and clear `loading`.
    pub fn finish(&mut self, result: OperationResult) {
        self.loading = false;
        self.success = result.success;
        self.error.clone_from(&result.error);
        self.result = Some(result);
    }

    /// Message of the last outcome.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.result.as_ref().map(|r| r.message.as_str())
    }
}

/// Account store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    /// Current session.
    pub session: AccountSession,
    /// Logout request in flight.
    pub logging_out: bool,
    /// `POST /accounts/register`
    pub registration: RequestState,
    /// `POST /accounts/activate`
    pub activation: RequestState,
    /// `POST /accounts/resend-activation`
    pub resend: RequestState,
    /// `POST /accounts/login`
    pub login: RequestState,
    /// `POST /auth/social-auth`
    pub social: RequestState,
    /// `POST /accounts/logout`
    pub logout: RequestState,
    /// `GET /accounts/me`
    pub user: RequestState,
    /// Profile from the last social sign-in.
    pub social_profile: Option<SocialProfile>,
    /// Whether the last social sign-in created the account.
    pub is_new_social_user: bool,
    /// Supported social providers.
    pub providers: Vec<String>,
    /// Non-blocking notice of a failed server logout.
    pub logout_warning: Option<String>,
}

impl AccountState {
    /// Derived session status.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if !self.session.is_initialized {
            SessionStatus::Uninitialized
        } else if self.logging_out {
            SessionStatus::LoggingOut
        } else if self.session.is_authenticated {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }

    /// Whether a session is established.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    /// Email of the signed-in user.
    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.session.current_user.as_ref().map(|u| u.email.as_str())
    }

    /// Display name from the social profile, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.social_profile.as_ref().and_then(|p| p.name.as_deref())
    }
}
