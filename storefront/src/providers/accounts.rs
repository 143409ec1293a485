//! Account and social sign-in API traits.

use crate::error::ApiError;
use crate::models::{
    AccountResponse, ActivationRequest, Credentials, CurrentUserResponse, LogoutResponse,
    ProvidersResponse, ResendActivationResponse, SocialAuthRequest, SocialAuthResponse, TokenPair,
};
use std::future::Future;

/// Email/password account endpoints under `/accounts`.
///
/// # Errors
///
/// Every method returns the normalised [`ApiError`] for transport failures
/// and non-success statuses; the status drives the user-facing message.
pub trait AccountApi: Send + Sync {
    /// `POST /accounts/register`
    ///
    /// # Errors
    ///
    /// 409 for a duplicate email, 422 for invalid input.
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AccountResponse, ApiError>> + Send;

    /// `POST /accounts/login`
    ///
    /// # Errors
    ///
    /// 401 for a wrong password, 403 for an inactive account, 404 for an
    /// unknown email.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send;

    /// `POST /accounts/logout`, revoking `refresh_token`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`]; callers treat it as a warning.
    fn logout(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<LogoutResponse, ApiError>> + Send;

    /// `GET /accounts/me`, authenticated with the refresh token as bearer.
    ///
    /// # Errors
    ///
    /// 401 when the token is invalid or expired.
    fn current_user(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<CurrentUserResponse, ApiError>> + Send;

    /// `POST /accounts/activate`
    ///
    /// # Errors
    ///
    /// 400 if already active, 404 for an unknown email, 410 for an expired
    /// token.
    fn activate(
        &self,
        request: &ActivationRequest,
    ) -> impl Future<Output = Result<AccountResponse, ApiError>> + Send;

    /// `POST /accounts/resend-activation`
    ///
    /// # Errors
    ///
    /// 400 if already active, 404 for an unknown email.
    fn resend_activation(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<ResendActivationResponse, ApiError>> + Send;
}

/// Social sign-in endpoints under `/auth/social-auth`.
pub trait SocialAuthApi: Send + Sync {
    /// `POST /auth/social-auth`
    ///
    /// # Errors
    ///
    /// 400 for an unsupported provider, 401 for a rejected provider token,
    /// 503 when the provider is unreachable.
    fn authenticate(
        &self,
        request: &SocialAuthRequest,
    ) -> impl Future<Output = Result<SocialAuthResponse, ApiError>> + Send;

    /// `GET /auth/social-auth/providers`
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`].
    fn providers(&self) -> impl Future<Output = Result<ProvidersResponse, ApiError>> + Send;
}
