//! Client Credentials flow
//!
//! App-only access: no user, no redirect, no refresh token. Every call asks
//! the token endpoint again; the flow only remembers the latest success.

use crate::error::{Error, Result};
use crate::token::{TokenRequest, TokenRequestExecutor, TokenResponse};

/// Client Credentials flow with a latest-response cache.
///
/// Requesting a token needs `&mut self`, so sharing one instance between
/// concurrent tasks requires the caller's own synchronization.
#[derive(Debug, Clone, Default)]
pub struct ClientCredentialsFlow {
    executor: TokenRequestExecutor,
    last_response: Option<TokenResponse>,
}

impl ClientCredentialsFlow {
    pub fn new(executor: TokenRequestExecutor) -> Self {
        Self {
            executor,
            last_response: None,
        }
    }

    /// Request a fresh app token. On success the response is also kept as
    /// [`last_response`](Self::last_response); on failure the previous one
    /// is left as it was.
    pub async fn request_token(
        &mut self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse> {
        if client_id.trim().is_empty() {
            return Err(Error::InvalidConfiguration("client_id is required".into()));
        }

        let token = self
            .executor
            .execute(&TokenRequest::ClientCredentials {
                client_id,
                client_secret,
            })
            .await?;
        self.last_response = Some(token.clone());
        Ok(token)
    }

    /// Latest successful response, if any.
    pub fn last_response(&self) -> Option<&TokenResponse> {
        self.last_response.as_ref()
    }

    pub fn executor(&self) -> &TokenRequestExecutor {
        &self.executor
    }
}
