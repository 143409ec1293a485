//! Error types and user-facing message mapping.
//!
//! Every transport failure is normalised into an [`ApiError`] at the HTTP
//! boundary. Stores never propagate these errors: they turn them into
//! operation results whose message comes from [`user_message`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fallible storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Normalised API error.
///
/// `status` is the HTTP status (500 when no response was received),
/// `message` the server-provided text (`detail`, then `message`), `field`
/// the offending field for validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Server-provided message, if any.
    pub message: Option<String>,
    /// Field that failed validation (422 only).
    pub field: Option<String>,
    /// Machine-readable error code.
    pub code: Option<String>,
}

impl ApiError {
    /// Create an error with only a status.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            message: None,
            field: None,
            code: None,
        }
    }

    /// Error for a request that produced no response (connect failure, timeout).
    #[must_use]
    pub fn network() -> Self {
        Self {
            code: Some("network_error".to_string()),
            ..Self::new(500)
        }
    }

    /// Attach a server message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the field that failed validation.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach a machine-readable code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Build an error from a non-success response body.
    ///
    /// Validation errors (422) read `message` then `detail` and carry
    /// `field`; everything else reads `detail` then `message`. Bodies that
    /// are not JSON objects yield an error with no message.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut error = Self::new(status);
        let Ok(serde_json::Value::Object(body)) = serde_json::from_str::<serde_json::Value>(body)
        else {
            return error;
        };

        let text = |key: &str| body.get(key).and_then(|v| v.as_str()).map(str::to_string);

        error.message = if status == 422 {
            text("message").or_else(|| text("detail"))
        } else {
            text("detail").or_else(|| text("message"))
        };
        if status == 422 {
            error.field = text("field");
        }
        error.code = text("code");
        error
    }

    /// 403: the account exists but is not activated.
    #[must_use]
    pub const fn needs_activation(&self) -> bool {
        self.status == 403
    }

    /// 404: no such account.
    #[must_use]
    pub const fn needs_registration(&self) -> bool {
        self.status == 404
    }

    /// 401: credential invalid or expired.
    #[must_use]
    pub const fn session_expired(&self) -> bool {
        self.status == 401
    }

    /// 410: activation token expired.
    #[must_use]
    pub const fn token_expired(&self) -> bool {
        self.status == 410
    }

    /// 409: duplicate account.
    #[must_use]
    pub const fn email_already_exists(&self) -> bool {
        self.status == 409
    }

    /// 422: field-level validation failure.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        self.status == 422
    }

    /// 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }
}

/// Account operations with their own message tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `POST /accounts/register`
    Registration,
    /// `POST /accounts/login`
    Login,
    /// `POST /accounts/activate`
    Activation,
    /// `POST /accounts/resend-activation`
    Resend,
    /// `POST /accounts/logout`
    Logout,
    /// `GET /accounts/me`
    User,
    /// `POST /auth/social-auth`
    Social,
    /// Anything without a dedicated table (catalog, providers)
    General,
}

const SERVER_ERROR: &str = "Server error. Please try again later.";
const CHECK_INPUT: &str = "Please check your input data";
const INVALID_LOGIN: &str = "Invalid login credentials. Please check your email and password.";

impl Operation {
    /// Message used when nothing more specific applies.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Registration => "Registration failed. Please try again.",
            Self::Login => "Login failed. Please try again.",
            Self::Activation => "Account activation failed. Please try again.",
            Self::Resend => "Failed to send activation email. Please try again.",
            Self::Logout => "Logout failed. Please try again.",
            Self::User => "Failed to load user data.",
            Self::Social => "Social authentication failed. Please try again.",
            Self::General => "Unexpected error. Please try again.",
        }
    }

    /// Operation-specific message for a status, if one is defined.
    ///
    /// Any 5xx without its own entry uses the operation's 500 entry.
    #[must_use]
    pub fn status_message(self, status: u16) -> Option<&'static str> {
        let exact = match (self, status) {
            (Self::Registration, 400) => Some(
                "Invalid registration data. Please check your information and try again.",
            ),
            (Self::Registration, 409) => Some(
                "This email address is already registered. Please use a different email or try signing in.",
            ),
            (Self::Registration | Self::Login, 422) => Some(CHECK_INPUT),

            (Self::Login, 400 | 401) => Some(INVALID_LOGIN),
            (Self::Login, 403) => Some(
                "Account not activated. Please check your email for activation instructions.",
            ),
            (Self::Login, 404) => Some(
                "User not found. Please check your credentials or register a new account.",
            ),

            (Self::Activation, 400) => {
                Some("Invalid activation data or account already activated.")
            },
            (Self::Activation | Self::Resend, 404) => {
                Some("User not found. Please check your email address.")
            },
            (Self::Activation, 410) => Some(
                "Activation token has expired. Please request a new activation email.",
            ),
            (Self::Activation, 422) => Some("Invalid activation link format."),

            (Self::Resend, 400) => Some("This account is already activated or invalid request."),
            (Self::Resend, 422) => Some("Please enter a valid email address."),

            (Self::Logout, 400) => Some("Invalid logout request."),
            (Self::Logout, 401) => Some("Unauthorized logout attempt."),
            (Self::Logout, 500) => Some("Server error during logout. Please try again later."),

            (Self::User, 401) => Some("Session expired. Please login again."),
            (Self::User, 404) => Some("User not found."),

            (Self::Social, 400) => Some("Invalid social authentication request"),
            (Self::Social, 401) => Some("Invalid access token from social provider"),
            (Self::Social, 422) => Some("Validation error during social authentication"),
            (Self::Social, 503) => Some("Social authentication service temporarily unavailable"),
            (Self::Social, 500) => {
                Some("Server error during social authentication. Please try again later.")
            },

            (
                Self::Registration | Self::Login | Self::Activation | Self::Resend | Self::User,
                500,
            ) => Some(SERVER_ERROR),

            _ => None,
        };

        match exact {
            Some(message) => Some(message),
            None if (501..600).contains(&status) => self.status_message(500),
            None => None,
        }
    }
}

/// Generic per-status message used after the operation table and the
/// server message.
const fn default_status_message(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("Bad request."),
        401 => Some("Authentication required."),
        403 => Some("Access denied."),
        404 => Some("Resource not found."),
        500..=599 => Some(SERVER_ERROR),
        _ => None,
    }
}

/// Turn an optional API error into the message shown to the user.
///
/// Precedence:
/// 1. 422 with both `field` and server message: `"{field}: {message}"`
/// 2. the operation's message for the status
/// 3. the server message
/// 4. the generic per-status message
/// 5. the operation fallback
#[must_use]
pub fn user_message(operation: Operation, error: Option<&ApiError>) -> String {
    let Some(error) = error else {
        return operation.fallback_message().to_string();
    };

    if error.status == 422 {
        if let (Some(field), Some(message)) = (&error.field, &error.message) {
            return format!("{field}: {message}");
        }
    }

    if let Some(message) = operation.status_message(error.status) {
        return message.to_string();
    }

    if let Some(message) = error.message.as_deref().filter(|m| !m.trim().is_empty()) {
        return message.to_string();
    }

    default_status_message(error.status)
        .unwrap_or_else(|| operation.fallback_message())
        .to_string()
}

/// Errors from the persisted key-value storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backing store could not be read or written.
    #[error("Storage I/O failed: {0}")]
    Io(String),

    /// Stored document is not valid JSON.
    #[error("Storage serialization failed: {0}")]
    Serialization(String),

    /// Internal lock was poisoned.
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Rejected filter mutations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// The change would leave `min_year > max_year`.
    #[error("Invalid year range: {min} > {max}")]
    InvalidYearRange {
        /// Requested lower bound
        min: i32,
        /// Requested upper bound
        max: i32,
    },

    /// A URL-driven synchronisation is in progress.
    #[error("Filters are being synchronised from the URL")]
    SyncInProgress,
}

/// Top-level error for client construction and configuration.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persisted storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration value missing or malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}
