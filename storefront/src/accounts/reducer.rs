//! Account store reducer.

use super::{AccountAction, AccountEnvironment, AccountState, OperationData, OperationResult};
use crate::constants::storage_keys;
use crate::error::{ApiError, Operation, user_message};
use crate::models::{ActivationRequest, Credentials, SocialAuthRequest};
use crate::providers::{AccountApi, SocialAuthApi, Storage};
use storefront_core::effect::Effect;
use storefront_core::reducer::Reducer;
use storefront_core::{SmallVec, async_effect, smallvec};

/// Reducer for [`AccountState`].
#[derive(Debug, Clone)]
pub struct AccountReducer<A, S> {
    _phantom: std::marker::PhantomData<(A, S)>,
}

impl<A, S> AccountReducer<A, S> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A, S> Default for AccountReducer<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `entries` to storage; failures are logged, never fatal.
fn persist<S>(storage: &S, entries: Vec<(&'static str, String)>) -> Effect<AccountAction>
where
    S: Storage + Clone + 'static,
{
    let storage = storage.clone();
    async_effect! {
        for (key, value) in entries {
            if let Err(err) = storage.set(key, &value) {
                tracing::warn!(key, error = %err, "Failed to persist session field");
            }
        }
        None
    }
}

/// Remove every persisted session field.
fn forget_session<S>(storage: &S) -> Effect<AccountAction>
where
    S: Storage + Clone + 'static,
{
    let storage = storage.clone();
    async_effect! {
        for key in storage_keys::SESSION_KEYS {
            if let Err(err) = storage.remove(key) {
                tracing::warn!(key, error = %err, "Failed to remove session field");
            }
        }
        None
    }
}

impl<A, S> AccountReducer<A, S>
where
    A: AccountApi + SocialAuthApi + Clone + 'static,
    S: Storage + Clone + 'static,
{
    /// Request the current user with the session's refresh token.
    fn fetch_current_user(
        state: &mut AccountState,
        env: &AccountEnvironment<A, S>,
    ) -> Effect<AccountAction> {
        let Some(refresh_token) = state.session.refresh_token.clone() else {
            tracing::debug!("No refresh token, skipping current user fetch");
            return Effect::None;
        };
        state.user.start();

        let api = env.api.clone();
        async_effect! {
            let result = api.current_user(&refresh_token).await;
            Some(AccountAction::CurrentUserLoaded { refresh_token, result })
        }
    }

    fn clear_local_session(state: &mut AccountState) {
        state.session.clear();
        state.social_profile = None;
        state.is_new_social_user = false;
        state.user = super::RequestState::default();
    }
}

impl<A, S> Reducer for AccountReducer<A, S>
where
    A: AccountApi + SocialAuthApi + Clone + 'static,
    S: Storage + Clone + 'static,
{
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AccountEnvironment<A, S>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Session restore
            // ═══════════════════════════════════════════════════════════
            AccountAction::Initialize => {
                let storage = env.storage.clone();
                smallvec![async_effect! {
                    let read = |key: &str| match storage.get(key) {
                        Ok(value) => value,
                        Err(err) => {
                            tracing::warn!(key, error = %err, "Failed to read session field");
                            None
                        },
                    };
                    Some(AccountAction::SessionRestored {
                        access_token: read(storage_keys::ACCESS_TOKEN),
                        refresh_token: read(storage_keys::REFRESH_TOKEN),
                    })
                }]
            },

            AccountAction::SessionRestored {
                access_token,
                refresh_token,
            } => {
                state.session.is_initialized = true;
                let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
                    tracing::debug!("No stored session");
                    state.session.is_authenticated = false;
                    return smallvec![Effect::None];
                };

                tracing::debug!("Stored session found, validating");
                state.session.access_token = access_token;
                state.session.refresh_token = Some(refresh_token);
                state.session.is_authenticated = true;
                smallvec![Self::fetch_current_user(state, env)]
            },

            AccountAction::FetchCurrentUser => smallvec![Self::fetch_current_user(state, env)],

            AccountAction::CurrentUserLoaded {
                refresh_token,
                result,
            } => {
                if !state.session.is_authenticated {
                    tracing::debug!("Session ended before current user arrived");
                    state.user.loading = false;
                    return smallvec![Effect::None];
                }
                // Only the session that issued the request may adopt its user
                if state.session.refresh_token.as_deref() != Some(refresh_token.as_str()) {
                    tracing::debug!("Discarding current user of a previous session");
                    return smallvec![Effect::None];
                }

                match result {
                    Ok(response) => {
                        let user = response.user;
                        let entries = vec![
                            (storage_keys::USER_ID, user.id.to_string()),
                            (storage_keys::USER_GROUP, user.group_name.clone()),
                            (storage_keys::USER_EMAIL, user.email.clone()),
                        ];
                        state.session.current_user = Some(user.clone());
                        state.user.finish(OperationResult::ok(
                            OperationData::User(user),
                            response.message,
                            "User loaded",
                        ));
                        smallvec![persist(&env.storage, entries)]
                    },
                    Err(err) if err.session_expired() => {
                        tracing::warn!("Stored session rejected, signing out");
                        Self::clear_local_session(state);
                        state
                            .user
                            .finish(OperationResult::failed(Operation::User, err));
                        smallvec![forget_session(&env.storage)]
                    },
                    Err(err) => {
                        tracing::warn!(status = err.status, "Current user failed to load");
                        state
                            .user
                            .finish(OperationResult::failed(Operation::User, err));
                        smallvec![Effect::None]
                    },
                }
            },

            // ═══════════════════════════════════════════════════════════
            // Registration, activation, resend
            // ═══════════════════════════════════════════════════════════
            AccountAction::Register { credentials } => {
                state.registration.start();
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.register(&credentials).await;
                    Some(AccountAction::RegisterCompleted { result })
                }]
            },

            AccountAction::RegisterCompleted { result } => {
                let outcome = match result {
                    Ok(response) => {
                        tracing::debug!(user_id = response.user.id, "Registered");
                        OperationResult::ok(
                            OperationData::User(response.user),
                            response.message,
                            "Registration successful",
                        )
                    },
                    Err(err) => {
                        tracing::warn!(status = err.status, "Registration failed");
                        OperationResult::failed(Operation::Registration, err)
                    },
                };
                state.registration.finish(outcome);
                smallvec![Effect::None]
            },

            AccountAction::Activate { request } => {
                state.activation.start();
                let api = env.api.clone();
                let request = ActivationRequest {
                    email: request.email.trim().to_string(),
                    token: request.token.trim().to_string(),
                };
                smallvec![async_effect! {
                    let result = api.activate(&request).await;
                    Some(AccountAction::ActivateCompleted { result })
                }]
            },

            AccountAction::ActivateCompleted { result } => {
                let outcome = match result {
                    Ok(response) => OperationResult::ok(
                        OperationData::User(response.user),
                        response.message,
                        "Account activated successfully",
                    ),
                    Err(err) => {
                        tracing::warn!(status = err.status, "Activation failed");
                        OperationResult::failed(Operation::Activation, err)
                    },
                };
                state.activation.finish(outcome);
                smallvec![Effect::None]
            },

            AccountAction::ResendActivation { email } => {
                state.resend.start();
                let api = env.api.clone();
                let email = email.trim().to_string();
                smallvec![async_effect! {
                    let result = api.resend_activation(&email).await;
                    Some(AccountAction::ResendCompleted { result })
                }]
            },

            AccountAction::ResendCompleted { result } => {
                let outcome = match result {
                    Ok(response) => OperationResult::ok(
                        OperationData::Email(response.email),
                        response.message,
                        "Activation email sent",
                    ),
                    Err(err) => OperationResult::failed(Operation::Resend, err),
                };
                state.resend.finish(outcome);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Login
            // ═══════════════════════════════════════════════════════════
            AccountAction::Login { credentials } => {
                state.login.start();
                let api = env.api.clone();
                let credentials = Credentials {
                    email: credentials.email.trim().to_string(),
                    password: credentials.password,
                };
                smallvec![async_effect! {
                    let result = api.login(&credentials).await;
                    Some(AccountAction::LoginCompleted { email: credentials.email, result })
                }]
            },

            AccountAction::LoginCompleted { email, result } => match result {
                Ok(tokens) => {
                    tracing::debug!("Logged in");
                    state.session.authenticate(&tokens);
                    let entries = vec![
                        (storage_keys::ACCESS_TOKEN, tokens.access_token.clone()),
                        (storage_keys::REFRESH_TOKEN, tokens.refresh_token.clone()),
                        (storage_keys::USER_EMAIL, email),
                    ];
                    state.login.finish(OperationResult::ok(
                        OperationData::Tokens(tokens),
                        None,
                        "Login successful",
                    ));
                    let persist = persist(&env.storage, entries);
                    let fetch_user = Self::fetch_current_user(state, env);
                    smallvec![Effect::chain(vec![persist, fetch_user])]
                },
                Err(err) => {
                    tracing::warn!(status = err.status, "Login failed");
                    state
                        .login
                        .finish(OperationResult::failed(Operation::Login, err));
                    smallvec![Effect::None]
                },
            },

            // ═══════════════════════════════════════════════════════════
            // Social sign-in
            // ═══════════════════════════════════════════════════════════
            AccountAction::SocialAuthenticate {
                provider,
                access_token,
            } => {
                state.social.start();
                let api = env.api.clone();
                let request = SocialAuthRequest {
                    provider: provider.trim().to_lowercase(),
                    access_token,
                };
                smallvec![async_effect! {
                    let result = api.authenticate(&request).await;
                    Some(AccountAction::SocialCompleted { result })
                }]
            },

            AccountAction::SocialCompleted { result } => {
                let response = match result {
                    Ok(response) if response.success && response.tokens.is_some() => response,
                    Ok(response) => {
                        let mut err = ApiError::new(401);
                        if let Some(message) = response.message {
                            err = err.with_message(message);
                        }
                        tracing::warn!("Social provider refused sign-in");
                        state
                            .social
                            .finish(OperationResult::failed(Operation::Social, err));
                        return smallvec![Effect::None];
                    },
                    Err(err) => {
                        tracing::warn!(status = err.status, "Social sign-in failed");
                        state
                            .social
                            .finish(OperationResult::failed(Operation::Social, err));
                        return smallvec![Effect::None];
                    },
                };

                let mut entries = Vec::with_capacity(4);
                if let Some(tokens) = &response.tokens {
                    state.session.authenticate(tokens);
                    entries.push((storage_keys::ACCESS_TOKEN, tokens.access_token.clone()));
                    entries.push((storage_keys::REFRESH_TOKEN, tokens.refresh_token.clone()));
                }
                if let Some(profile) = &response.user_profile {
                    entries.push((storage_keys::USER_EMAIL, profile.email.clone()));
                    if let Some(name) = &profile.name {
                        entries.push((storage_keys::USER_NAME, name.clone()));
                    }
                }
                tracing::debug!(
                    provider = response.provider.as_deref().unwrap_or_default(),
                    is_new_user = response.is_new_user,
                    "Signed in with social provider"
                );

                state.social_profile.clone_from(&response.user_profile);
                state.is_new_social_user = response.is_new_user;
                let message = response.message.clone();
                state.social.finish(OperationResult::ok(
                    OperationData::Social(Box::new(response)),
                    message,
                    "Social authentication successful",
                ));

                let persist = persist(&env.storage, entries);
                let fetch_user = Self::fetch_current_user(state, env);
                smallvec![Effect::chain(vec![persist, fetch_user])]
            },

            AccountAction::FetchProviders => {
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = api.providers().await;
                    Some(AccountAction::ProvidersLoaded { result })
                }]
            },

            AccountAction::ProvidersLoaded { result } => {
                match result {
                    Ok(response) => state.providers = response.providers,
                    Err(err) => {
                        tracing::warn!(status = err.status, "Social providers failed to load");
                        state.providers.clear();
                    },
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════
            // Logout
            // ═══════════════════════════════════════════════════════════
            AccountAction::Logout => {
                if state.logging_out {
                    return smallvec![Effect::None];
                }
                state.logging_out = true;
                state.logout.start();
                state.logout_warning = None;

                let refresh_token = state.session.refresh_token.clone();
                let api = env.api.clone();
                smallvec![async_effect! {
                    let result = match refresh_token {
                        Some(token) => api.logout(&token).await,
                        None => Ok(crate::models::LogoutResponse::default()),
                    };
                    Some(AccountAction::LogoutCompleted { result })
                }]
            },

            AccountAction::LogoutCompleted { result } => {
                state.logging_out = false;
                Self::clear_local_session(state);
                state.registration = super::RequestState::default();
                state.activation = super::RequestState::default();
                state.login = super::RequestState::default();
                state.social = super::RequestState::default();

                let server_message = match result {
                    Ok(response) => response.message,
                    Err(err) => {
                        tracing::warn!(status = err.status, "Server logout failed, session cleared locally");
                        state.logout_warning = Some(user_message(Operation::Logout, Some(&err)));
                        None
                    },
                };
                state.logout.finish(OperationResult::ok(
                    OperationData::Empty,
                    server_message,
                    "Logged out successfully",
                ));
                smallvec![forget_session(&env.storage)]
            },

            // ═══════════════════════════════════════════════════════════
            // Resets
            // ═══════════════════════════════════════════════════════════
            AccountAction::ClearRegistrationState => {
                state.registration = super::RequestState::default();
                smallvec![Effect::None]
            },
            AccountAction::ClearActivationState => {
                state.activation = super::RequestState::default();
                smallvec![Effect::None]
            },
            AccountAction::ClearResendState => {
                state.resend = super::RequestState::default();
                smallvec![Effect::None]
            },
            AccountAction::ClearLoginState => {
                state.login = super::RequestState::default();
                smallvec![Effect::None]
            },
            AccountAction::ClearSocialState => {
                state.social = super::RequestState::default();
                state.social_profile = None;
                state.is_new_social_user = false;
                smallvec![Effect::None]
            },
            AccountAction::ClearLogoutWarning => {
                state.logout_warning = None;
                smallvec![Effect::None]
            },
            AccountAction::ResetState => {
                *state = AccountState::default();
                smallvec![Effect::None]
            },
        }
    }
}
