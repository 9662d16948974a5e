//! Service-specific error types

use thiserror::Error;

pub const USAGE: &str = "spotify-token [--config <path>] <authorize-url [--pkce] | exchange <code> [--verifier <verifier>] | refresh <refresh_token> | client-credentials>";

/// Command-line errors. Token and configuration failures come from
/// `spotify_auth::Error` and `common::Error` respectively.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid arguments: {0}")]
    Usage(String),

    #[error("`{0}` needs a client secret: set SPOTIFY_CLIENT_SECRET or client_secret_file")]
    MissingClientSecret(&'static str),
}

impl Error {
    /// Usage error with the synopsis appended.
    pub fn usage(reason: impl std::fmt::Display) -> Self {
        Self::Usage(format!("{reason}\nusage: {USAGE}"))
    }
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
