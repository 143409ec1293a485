//! Account store actions.

use crate::error::ApiError;
use crate::models::{
    AccountResponse, ActivationRequest, Credentials, CurrentUserResponse, LogoutResponse,
    ProvidersResponse, ResendActivationResponse, SocialAuthResponse, TokenPair,
};

/// Inputs to the account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    // ═══════════════════════════════════════════════════════════
    // Session
    // ═══════════════════════════════════════════════════════════
    /// Read stored credentials.
    Initialize,
    /// Stored credentials were read.
    SessionRestored {
        /// Stored access token.
        access_token: Option<String>,
        /// Stored refresh token.
        refresh_token: Option<String>,
    },
    /// Load the signed-in user.
    FetchCurrentUser,
    /// `GET /accounts/me` finished.
    CurrentUserLoaded {
        /// Refresh token the request was made with.
        refresh_token: String,
        /// User or failure.
        result: Result<CurrentUserResponse, ApiError>,
    },

    // ═══════════════════════════════════════════════════════════
    // Requests
    // ═══════════════════════════════════════════════════════════
    /// Register an account.
    Register {
        /// Email and password.
        credentials: Credentials,
    },
    /// Registration finished.
    RegisterCompleted {
        /// Account or failure.
        result: Result<AccountResponse, ApiError>,
    },
    /// Activate an account.
    Activate {
        /// Email and token.
        request: ActivationRequest,
    },
    /// Activation finished.
    ActivateCompleted {
        /// Account or failure.
        result: Result<AccountResponse, ApiError>,
    },
    /// Send a new activation email.
    ResendActivation {
        /// Account email.
        email: String,
    },
    /// Resend finished.
    ResendCompleted {
        /// Confirmation or failure.
        result: Result<ResendActivationResponse, ApiError>,
    },
    /// Sign in with email and password.
    Login {
        /// Email and password.
        credentials: Credentials,
    },
    /// Login finished.
    LoginCompleted {
        /// Email used, persisted on success.
        email: String,
        /// Tokens or failure.
        result: Result<TokenPair, ApiError>,
    },
    /// Sign in with a social provider token.
    SocialAuthenticate {
        /// Provider name.
        provider: String,
        /// Token from the provider SDK.
        access_token: String,
    },
    /// Social sign-in finished.
    SocialCompleted {
        /// Outcome or failure.
        result: Result<SocialAuthResponse, ApiError>,
    },
    /// Load supported social providers.
    FetchProviders,
    /// Providers loaded.
    ProvidersLoaded {
        /// Providers or failure.
        result: Result<ProvidersResponse, ApiError>,
    },
    /// Sign out.
    Logout,
    /// Server logout finished (the local session is cleared either way).
    LogoutCompleted {
        /// Confirmation or failure.
        result: Result<LogoutResponse, ApiError>,
    },

    // ═══════════════════════════════════════════════════════════
    // Resets
    // ═══════════════════════════════════════════════════════════
    /// Forget registration outcome.
    ClearRegistrationState,
    /// Forget activation outcome.
    ClearActivationState,
    /// Forget resend outcome.
    ClearResendState,
    /// Forget login outcome.
    ClearLoginState,
    /// Forget social sign-in outcome and profile.
    ClearSocialState,
    /// Dismiss the logout warning.
    ClearLogoutWarning,
    /// Back to the initial state (session included, storage untouched).
    ResetState,
}
