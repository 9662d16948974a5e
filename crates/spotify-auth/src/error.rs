//! Error types for Spotify authorization operations

use crate::transport::TransportError;

/// Errors from grant flows and token requests.
///
/// Transport failures never leak past the token executor: they arrive here
/// as `HttpRequestFailed`. Anything the accounts service answered but did
/// not grant is `AuthorizationFailed`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required flow parameter was missing or malformed. Nothing was sent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The token endpoint could not be reached or the exchange broke mid-way.
    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),

    /// The token endpoint was reached but did not issue a token.
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),
}

impl Error {
    /// Whether retrying the same request later could succeed.
    ///
    /// Only transport failures qualify; rejected credentials or codes need
    /// the caller to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpRequestFailed(_))
    }

    /// Short label for the `outcome` metric dimension.
    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::HttpRequestFailed(_) => "http_error",
            Self::AuthorizationFailed(_) => "rejected",
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Self::HttpRequestFailed(err.to_string())
    }
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
