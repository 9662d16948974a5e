//! Token endpoint exchanges
//!
//! Every grant ends in the same interaction: one form POST to the token
//! endpoint. `TokenRequest` describes what goes on the wire for each grant
//! and `TokenRequestExecutor` sends it and interprets the answer.
//!
//! Outcome rules:
//! 1. Transport failure → `HttpRequestFailed`
//! 2. No body (empty, whitespace or JSON `null`) → `AuthorizationFailed`
//! 3. Non-2xx status → `AuthorizationFailed`, with the OAuth error if given
//! 4. Body that is not a token response → `AuthorizationFailed`
//! 5. Otherwise the deserialized `TokenResponse`, untouched

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{ACCOUNTS_BASE_URL, REJECTED_MESSAGE, token_endpoint};
use crate::credentials;
use crate::error::{Error, Result};
use crate::metrics::record_token_request;
use crate::transport::{FormRequest, ReqwestTransport, Transport, TransportResponse};

/// Response from the token endpoint for every grant.
///
/// `refresh_token` is absent for Client Credentials and may be absent on
/// refresh (Spotify then keeps the previous one valid).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer" for Spotify
    pub token_type: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Space-delimited scopes actually granted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// `Authorization` header value for Web API calls.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Absolute expiry, given the instant the response was received.
    /// `None` when `expires_in` is too large to represent.
    pub fn expires_at(&self, received_at: SystemTime) -> Option<SystemTime> {
        received_at.checked_add(Duration::from_secs(self.expires_in))
    }

    /// Granted scopes, in the order the server listed them.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.as_deref().unwrap_or_default().split_whitespace()
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .finish()
    }
}

/// OAuth error body (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// One token endpoint request, per grant.
///
/// | variant | Authorization | form fields |
/// |---|---|---|
/// | `AuthorizationCode` | Basic | grant_type, code, redirect_uri |
/// | `AuthorizationCodePkce` | none | grant_type, client_id, code, redirect_uri, code_verifier |
/// | `Refresh` | Basic | grant_type, refresh_token |
/// | `PublicRefresh` | none | grant_type, refresh_token, client_id |
/// | `ClientCredentials` | Basic | grant_type |
#[derive(Clone, Copy)]
pub enum TokenRequest<'a> {
    AuthorizationCode {
        client_id: &'a str,
        client_secret: &'a str,
        code: &'a str,
        redirect_uri: &'a str,
    },
    AuthorizationCodePkce {
        client_id: &'a str,
        code: &'a str,
        redirect_uri: &'a str,
        code_verifier: &'a str,
    },
    Refresh {
        client_id: &'a str,
        client_secret: &'a str,
        refresh_token: &'a str,
    },
    PublicRefresh {
        client_id: &'a str,
        refresh_token: &'a str,
    },
    ClientCredentials {
        client_id: &'a str,
        client_secret: &'a str,
    },
}

impl TokenRequest<'_> {
    /// OAuth `grant_type` form value.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::AuthorizationCode { .. } | Self::AuthorizationCodePkce { .. } => {
                "authorization_code"
            }
            Self::Refresh { .. } | Self::PublicRefresh { .. } => "refresh_token",
            Self::ClientCredentials { .. } => "client_credentials",
        }
    }

    /// Finer-grained name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthorizationCode { .. } => "authorization_code",
            Self::AuthorizationCodePkce { .. } => "authorization_code_pkce",
            Self::Refresh { .. } => "refresh_token",
            Self::PublicRefresh { .. } => "refresh_token_public",
            Self::ClientCredentials { .. } => "client_credentials",
        }
    }

    /// Basic credential for confidential-client requests, derived fresh.
    fn authorization(&self) -> Option<Secret<String>> {
        match *self {
            Self::AuthorizationCode {
                client_id,
                client_secret,
                ..
            }
            | Self::Refresh {
                client_id,
                client_secret,
                ..
            }
            | Self::ClientCredentials {
                client_id,
                client_secret,
            } => Some(Secret::new(credentials::encode(client_id, client_secret))),
            Self::AuthorizationCodePkce { .. } | Self::PublicRefresh { .. } => None,
        }
    }

    fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("grant_type", self.grant_type().to_string())];
        match *self {
            Self::AuthorizationCode {
                code, redirect_uri, ..
            } => {
                form.push(("code", code.to_string()));
                form.push(("redirect_uri", redirect_uri.to_string()));
            }
            Self::AuthorizationCodePkce {
                client_id,
                code,
                redirect_uri,
                code_verifier,
            } => {
                form.push(("client_id", client_id.to_string()));
                form.push(("code", code.to_string()));
                form.push(("redirect_uri", redirect_uri.to_string()));
                form.push(("code_verifier", code_verifier.to_string()));
            }
            Self::Refresh { refresh_token, .. } => {
                form.push(("refresh_token", refresh_token.to_string()));
            }
            Self::PublicRefresh {
                client_id,
                refresh_token,
            } => {
                form.push(("refresh_token", refresh_token.to_string()));
                form.push(("client_id", client_id.to_string()));
            }
            Self::ClientCredentials { .. } => {}
        }
        form
    }

    /// The wire request for this grant against `token_endpoint`.
    pub fn to_form_request(&self, token_endpoint: &str) -> FormRequest {
        FormRequest {
            url: token_endpoint.to_string(),
            authorization: self.authorization(),
            form: self.form(),
        }
    }
}

/// Sends token requests and maps the outcome to `TokenResponse` or `Error`.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct TokenRequestExecutor {
    transport: Arc<dyn Transport>,
    token_endpoint: String,
}

impl TokenRequestExecutor {
    /// Executor targeting Spotify's token endpoint through `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            token_endpoint: token_endpoint(ACCOUNTS_BASE_URL),
        }
    }

    /// Point at a different token endpoint (full URL).
    pub fn with_token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.token_endpoint = token_endpoint.into();
        self
    }

    pub fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    /// Perform one token request. No retries; see module docs for outcomes.
    pub async fn execute(&self, request: &TokenRequest<'_>) -> Result<TokenResponse> {
        let kind = request.kind();
        let wire = request.to_form_request(&self.token_endpoint);
        let started = Instant::now();

        debug!(grant = kind, endpoint = %self.token_endpoint, "sending token request");

        let result = match self.transport.post_form(&wire).await {
            Ok(response) => interpret(response),
            Err(e) => Err(Error::from(e)),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        record_token_request(kind, outcome, started.elapsed().as_secs_f64());

        match &result {
            Ok(token) => info!(
                grant = kind,
                expires_in = token.expires_in,
                has_refresh_token = token.refresh_token.is_some(),
                "token issued"
            ),
            Err(e) => warn!(grant = kind, error = %e, "token request failed"),
        }

        result
    }

    /// Refresh an access token with confidential-client (Basic) credentials.
    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        self.execute(&TokenRequest::Refresh {
            client_id,
            client_secret,
            refresh_token,
        })
        .await
    }
}

impl Default for TokenRequestExecutor {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::default()))
    }
}

impl fmt::Debug for TokenRequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequestExecutor")
            .field("token_endpoint", &self.token_endpoint)
            .finish_non_exhaustive()
    }
}

fn interpret(response: TransportResponse) -> Result<TokenResponse> {
    let status = response.status;
    let body = response.body.trim_ascii();

    if body.is_empty() || body == b"null" {
        return Err(Error::AuthorizationFailed(format!(
            "{REJECTED_MESSAGE} (status {status}, empty body)"
        )));
    }

    if !(200..300).contains(&status) {
        return Err(Error::AuthorizationFailed(describe_rejection(status, body)));
    }

    serde_json::from_slice::<TokenResponse>(body)
        .map_err(|e| Error::AuthorizationFailed(format!("invalid token response: {e}")))
}

fn describe_rejection(status: u16, body: &[u8]) -> String {
    match serde_json::from_slice::<OAuthErrorBody>(body) {
        Ok(OAuthErrorBody {
            error,
            error_description: Some(description),
        }) => format!("token endpoint returned {status}: {error}: {description}"),
        Ok(OAuthErrorBody { error, .. }) => format!("token endpoint returned {status}: {error}"),
        Err(_) => {
            let text = String::from_utf8_lossy(body);
            let excerpt: String = text.chars().take(200).collect();
            format!("token endpoint returned {status}: {excerpt}")
        }
    }
}
