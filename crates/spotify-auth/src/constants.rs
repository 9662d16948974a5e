//! Spotify accounts service endpoints and protocol constants
//!
//! The accounts service hosts both the user-facing authorize page and the
//! token endpoint. Deployments (and tests) may point at a different base URL;
//! these are only the defaults.

/// Base URL of the Spotify accounts service
pub const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Path of the authorize page, relative to the accounts base URL
pub const AUTHORIZE_PATH: &str = "/authorize";

/// Path of the token endpoint, relative to the accounts base URL
pub const TOKEN_PATH: &str = "/api/token";

/// The only response type Spotify supports for redirect-based flows
pub const DEFAULT_RESPONSE_TYPE: &str = "code";

/// Message used when the token endpoint answers without a usable body.
pub const REJECTED_MESSAGE: &str = "credentials or request rejected";

/// Full token endpoint URL for an accounts base URL.
pub fn token_endpoint(accounts_base_url: &str) -> String {
    format!("{}{}", accounts_base_url.trim_end_matches('/'), TOKEN_PATH)
}

/// Full authorize page URL for an accounts base URL.
pub fn authorize_endpoint(accounts_base_url: &str) -> String {
    format!("{}{}", accounts_base_url.trim_end_matches('/'), AUTHORIZE_PATH)
}
