//! Mock account and social sign-in API.

use super::lock;
use crate::error::ApiError;
use crate::models::{
    AccountResponse, ActivationRequest, Credentials, CurrentUserResponse, LogoutResponse,
    ProvidersResponse, ResendActivationResponse, SocialAuthRequest, SocialAuthResponse,
    SocialProfile, TokenPair, User,
};
use crate::providers::{AccountApi, SocialAuthApi};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug)]
struct MockUser {
    user: User,
    password: String,
    activation_token: Option<String>,
    activation_expired: bool,
}

#[derive(Debug, Default)]
struct AccountData {
    users: HashMap<String, MockUser>,
    refresh_tokens: HashMap<String, String>,
    social_identities: HashMap<(String, String), SocialProfile>,
    providers: Vec<String>,
    next_id: u64,
    issued: u64,
    failure: Option<ApiError>,
    logout_failure: Option<ApiError>,
    social_unavailable: bool,
    revoked: Vec<String>,
}

impl AccountData {
    fn create_user(&mut self, email: &str, password: &str, active: bool) -> User {
        self.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: self.next_id,
            email: email.to_string(),
            is_active: active,
            created_at: now,
            updated_at: now,
            group_id: 1,
            group_name: "user".to_string(),
        };
        self.users.insert(
            email.to_string(),
            MockUser {
                user: user.clone(),
                password: password.to_string(),
                activation_token: (!active).then(|| format!("activate-{}", user.id)),
                activation_expired: false,
            },
        );
        user
    }

    fn issue_tokens(&mut self, email: &str) -> TokenPair {
        self.issued += 1;
        let refresh_token = format!("refresh-{}", self.issued);
        self.refresh_tokens
            .insert(refresh_token.clone(), email.to_string());
        TokenPair {
            access_token: format!("access-{}", self.issued),
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in: None,
        }
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

/// In-memory account backend.
///
/// Mirrors the backend's status codes: 409 duplicate email, 422 short
/// password, 404 unknown email, 401 wrong password or token, 403 inactive
/// account, 400 already active, 410 expired activation token.
#[derive(Debug, Clone)]
pub struct MockAccountApi {
    data: Arc<Mutex<AccountData>>,
}

impl MockAccountApi {
    /// Empty backend supporting `google` and `facebook`.
    #[must_use]
    pub fn new() -> Self {
        let data = AccountData {
            providers: vec!["google".to_string(), "facebook".to_string()],
            ..AccountData::default()
        };
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Add a user.
    #[must_use]
    pub fn with_user(self, email: &str, password: &str, active: bool) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.create_user(email, password, active);
        }
        self
    }

    /// Accept `access_token` from `provider` as identifying `profile`.
    #[must_use]
    pub fn with_social_identity(self, access_token: &str, profile: SocialProfile) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.social_identities
                .insert((profile.provider.clone(), access_token.to_string()), profile);
        }
        self
    }

    /// Fail every call with `error` (`None` to recover).
    pub fn fail_all(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.failure = error;
        }
    }

    /// Fail logout only.
    pub fn fail_logout(&self, error: Option<ApiError>) {
        if let Ok(mut data) = self.data.lock() {
            data.logout_failure = error;
        }
    }

    /// Make social sign-in answer 503.
    pub fn set_social_unavailable(&self, unavailable: bool) {
        if let Ok(mut data) = self.data.lock() {
            data.social_unavailable = unavailable;
        }
    }

    /// Mark the pending activation token of `email` as expired.
    pub fn expire_activation(&self, email: &str) {
        if let Ok(mut data) = self.data.lock() {
            if let Some(user) = data.users.get_mut(email) {
                user.activation_expired = true;
            }
        }
    }

    /// Pending activation token of `email`.
    #[must_use]
    pub fn activation_token(&self, email: &str) -> Option<String> {
        self.data
            .lock()
            .ok()
            .and_then(|data| data.users.get(email)?.activation_token.clone())
    }

    /// Refresh tokens revoked by logout.
    #[must_use]
    pub fn revoked_tokens(&self) -> Vec<String> {
        self.data
            .lock()
            .map(|data| data.revoked.clone())
            .unwrap_or_default()
    }
}

impl Default for MockAccountApi {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountApi for MockAccountApi {
    fn register(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<AccountResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let credentials = credentials.clone();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;

            if data.users.contains_key(&credentials.email) {
                return Err(ApiError::new(409).with_message("Email already registered"));
            }
            if credentials.password.len() < MIN_PASSWORD_LEN {
                return Err(ApiError::new(422)
                    .with_field("password")
                    .with_message("String should have at least 8 characters"));
            }

            let user = data.create_user(&credentials.email, &credentials.password, false);
            Ok(AccountResponse {
                user,
                message: Some("User registered successfully. Please check your email.".into()),
            })
        }
    }

    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let credentials = credentials.clone();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;

            let Some(user) = data.users.get(&credentials.email) else {
                return Err(ApiError::new(404).with_message("User not found"));
            };
            if user.password != credentials.password {
                return Err(ApiError::new(401).with_message("Incorrect email or password"));
            }
            if !user.user.is_active {
                return Err(ApiError::new(403).with_message("Account is not activated"));
            }
            Ok(data.issue_tokens(&credentials.email))
        }
    }

    fn logout(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<LogoutResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let refresh_token = refresh_token.to_string();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;
            if let Some(error) = data.logout_failure.clone() {
                return Err(error);
            }
            data.refresh_tokens.remove(&refresh_token);
            data.revoked.push(refresh_token);
            Ok(LogoutResponse {
                message: Some("Successfully logged out".into()),
            })
        }
    }

    fn current_user(
        &self,
        refresh_token: &str,
    ) -> impl Future<Output = Result<CurrentUserResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let refresh_token = refresh_token.to_string();

        async move {
            let data = lock(&data)?;
            data.check_failure()?;

            let user = data
                .refresh_tokens
                .get(&refresh_token)
                .and_then(|email| data.users.get(email))
                .ok_or_else(|| ApiError::new(401).with_message("Invalid or expired token"))?;
            Ok(CurrentUserResponse {
                user: user.user.clone(),
                message: None,
            })
        }
    }

    fn activate(
        &self,
        request: &ActivationRequest,
    ) -> impl Future<Output = Result<AccountResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let request = request.clone();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;

            let Some(user) = data.users.get_mut(&request.email) else {
                return Err(ApiError::new(404).with_message("User not found"));
            };
            if user.user.is_active {
                return Err(ApiError::new(400).with_message("User is already activated"));
            }
            if user.activation_token.as_deref() != Some(request.token.as_str()) {
                return Err(ApiError::new(400).with_message("Invalid activation token"));
            }
            if user.activation_expired {
                return Err(ApiError::new(410).with_message("Activation token has expired"));
            }

            user.user.is_active = true;
            user.user.updated_at = Utc::now();
            user.activation_token = None;
            Ok(AccountResponse {
                user: user.user.clone(),
                message: Some("Account activated successfully".into()),
            })
        }
    }

    fn resend_activation(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<ResendActivationResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let email = email.to_string();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;

            let Some(user) = data.users.get_mut(&email) else {
                return Err(ApiError::new(404).with_message("User not found"));
            };
            if user.user.is_active {
                return Err(ApiError::new(400).with_message("User is already activated"));
            }
            user.activation_token = Some(format!("activate-{}-resent", user.user.id));
            user.activation_expired = false;
            Ok(ResendActivationResponse {
                message: Some("Activation email sent".into()),
                email,
            })
        }
    }
}

impl SocialAuthApi for MockAccountApi {
    fn authenticate(
        &self,
        request: &SocialAuthRequest,
    ) -> impl Future<Output = Result<SocialAuthResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);
        let request = request.clone();

        async move {
            let mut data = lock(&data)?;
            data.check_failure()?;

            if !data.providers.contains(&request.provider) {
                return Err(ApiError::new(400)
                    .with_message(format!("Unsupported provider: {}", request.provider)));
            }
            if data.social_unavailable {
                return Err(ApiError::new(503).with_message("Provider unreachable"));
            }
            let key = (request.provider.clone(), request.access_token.clone());
            let Some(profile) = data.social_identities.get(&key).cloned() else {
                return Err(ApiError::new(401).with_message("Invalid access token"));
            };

            let is_new_user = !data.users.contains_key(&profile.email);
            if is_new_user {
                data.create_user(&profile.email, "", true);
            }
            let tokens = TokenPair {
                expires_in: Some(1800),
                ..data.issue_tokens(&profile.email)
            };
            Ok(SocialAuthResponse {
                success: true,
                tokens: Some(tokens),
                user_profile: Some(profile),
                is_new_user,
                message: Some("Authentication successful".into()),
                provider: Some(request.provider),
            })
        }
    }

    fn providers(&self) -> impl Future<Output = Result<ProvidersResponse, ApiError>> + Send {
        let data = Arc::clone(&self.data);

        async move {
            let data = lock(&data)?;
            data.check_failure()?;
            Ok(ProvidersResponse {
                providers: data.providers.clone(),
                total_count: data.providers.len(),
            })
        }
    }
}
