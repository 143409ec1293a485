//! Shared constants: page sizes, ordering, persisted storage keys.

/// Allowed page sizes.
pub const ITEMS_PER_PAGE_OPTIONS: [u32; 4] = [8, 12, 16, 20];

/// Page size when nothing else is known.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 12;

/// Minimum time a legal document must stay open before it can be accepted.
pub const LEGAL_MIN_READ_TIME_MS: i64 = 2000;

/// Persisted storage keys.
pub mod storage_keys {
    /// Access token from the last login.
    pub const ACCESS_TOKEN: &str = "accessToken";
    /// Durable refresh token.
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Email of the signed-in user.
    pub const USER_EMAIL: &str = "userEmail";
    /// Id of the signed-in user.
    pub const USER_ID: &str = "userId";
    /// Group name of the signed-in user.
    pub const USER_GROUP: &str = "userGroup";
    /// Display name (social sign-in only).
    pub const USER_NAME: &str = "userName";
    /// JSON document with page size and theme.
    pub const USER_PREFERENCES: &str = "user-preferences";
    /// `"true"` once the terms were accepted.
    pub const TERMS_ACCEPTED: &str = "termsAccepted";
    /// `"true"` once the privacy policy was acknowledged.
    pub const PRIVACY_ACKNOWLEDGED: &str = "privacyAcknowledged";

    /// Keys cleared on logout.
    pub const SESSION_KEYS: [&str; 6] = [
        ACCESS_TOKEN,
        REFRESH_TOKEN,
        USER_EMAIL,
        USER_ID,
        USER_GROUP,
        USER_NAME,
    ];
}
