//! Wire types exchanged with the REST backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════

/// Product summary as listed by the catalog endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub product_id: u64,
    /// Gender label as stored (e.g. `"Women"`).
    pub gender: String,
    /// Release year.
    pub year: i32,
    /// Display name.
    pub product_display_name: String,
    /// Image location.
    pub image_url: String,
}

/// One page of products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Link to the previous page.
    #[serde(default)]
    pub prev_page: Option<String>,
    /// Link to the next page.
    #[serde(default)]
    pub next_page: Option<String>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of matching products.
    pub total_items: u64,
}

/// Checkbox filter options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxFilter {
    /// Selectable values.
    pub values: Vec<String>,
}

/// Inclusive year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Earliest year.
    pub min: i32,
    /// Latest year.
    pub max: i32,
}

/// Filter options offered by the backend for a listing.
///
/// The default (both `None`) is the neutral shape used when filters are
/// unknown or failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableFilters {
    /// Gender options.
    #[serde(default)]
    pub gender: Option<CheckboxFilter>,
    /// Year bounds.
    #[serde(default)]
    pub year: Option<YearRange>,
}

impl AvailableFilters {
    /// Whether nothing is offered.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.gender.is_none() && self.year.is_none()
    }
}

/// Search-suggestion response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    /// Suggested product names.
    pub suggestions: Vec<String>,
}

/// Article type (third category level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleTypeDto {
    /// Identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Sub-category (second level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategoryDto {
    /// Identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Article types.
    #[serde(default)]
    pub article_types: Vec<ArticleTypeDto>,
}

/// Master category (first level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterCategoryDto {
    /// Identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Sub-categories.
    #[serde(default)]
    pub sub_categories: Vec<SubCategoryDto>,
}

/// `GET /catalog/categories` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMenu {
    /// Master categories.
    #[serde(default)]
    pub categories: Vec<MasterCategoryDto>,
}

// ═══════════════════════════════════════════════════════════
// Accounts
// ═══════════════════════════════════════════════════════════

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: u64,
    /// Email address.
    pub email: String,
    /// Whether the account was activated.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update.
    pub updated_at: DateTime<Utc>,
    /// Group identifier.
    pub group_id: u64,
    /// Group name (e.g. `"user"`).
    pub group_name: String,
}

/// Email and password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address.
    pub email: String,
    /// Plain-text password, only ever sent over TLS.
    pub password: String,
}

/// Activation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRequest {
    /// Email address.
    pub email: String,
    /// Token from the activation email.
    pub token: String,
}

/// Response of register and activate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Affected user.
    pub user: User,
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of resend-activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendActivationResponse {
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
    /// Address the email was sent to.
    pub email: String,
}

/// Response of `GET /accounts/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    /// The signed-in user.
    pub user: User,
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Durable refresh token.
    pub refresh_token: String,
    /// Token type, `"bearer"`.
    #[serde(default = "bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds (social sign-in only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

fn bearer() -> String {
    "bearer".to_string()
}

/// Logout response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Social sign-in request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAuthRequest {
    /// Provider name (`"google"`, `"facebook"`).
    pub provider: String,
    /// Access token issued by the provider SDK.
    pub access_token: String,
}

/// Profile reported by the social provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// Provider name.
    pub provider: String,
    /// Identifier at the provider.
    pub provider_id: String,
    /// Email address.
    pub email: String,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Avatar location.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Locale.
    #[serde(default)]
    pub locale: Option<String>,
    /// Whether the provider verified the email.
    #[serde(default)]
    pub verified_email: bool,
}

/// Social sign-in response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialAuthResponse {
    /// Whether sign-in succeeded.
    pub success: bool,
    /// Issued tokens.
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    /// Provider profile.
    #[serde(default)]
    pub user_profile: Option<SocialProfile>,
    /// Whether the account was created by this sign-in.
    #[serde(default)]
    pub is_new_user: bool,
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
    /// Provider name.
    #[serde(default)]
    pub provider: Option<String>,
}

/// Supported social providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersResponse {
    /// Provider names.
    pub providers: Vec<String>,
    /// Number of providers.
    #[serde(default)]
    pub total_count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filters_accept_backend_shape() {
        let json = r#"{"gender":{"values":["Men","Women"],"type":"checkbox"},"year":{"min":2010,"max":2023,"type":"range"}}"#;
        let filters: AvailableFilters = serde_json::from_str(json).unwrap();
        assert_eq!(filters.year, Some(YearRange { min: 2010, max: 2023 }));
        assert_eq!(filters.gender.map(|g| g.values.len()), Some(2));

        let neutral: AvailableFilters =
            serde_json::from_str(r#"{"gender":null,"year":null}"#).unwrap();
        assert!(neutral.is_neutral());
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let tokens: TokenPair =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(tokens.token_type, "bearer");
        assert!(tokens.expires_in.is_none());
    }

    #[test]
    fn user_timestamps_parse() {
        let json = r#"{"id":7,"email":"a@b.c","is_active":true,
            "created_at":"2025-01-01T10:00:00Z","updated_at":"2025-01-02T10:00:00Z",
            "group_id":1,"group_name":"user"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.updated_at > user.created_at);
    }
}
