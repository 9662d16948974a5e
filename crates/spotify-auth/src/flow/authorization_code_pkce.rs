//! Authorization Code flow with PKCE (public client)
//!
//! Same redirect dance as the confidential flow, but the client never holds
//! a secret. The authorize URL carries a code challenge and the exchange
//! proves possession of the matching verifier.

use super::required;
use crate::constants::{ACCOUNTS_BASE_URL, DEFAULT_RESPONSE_TYPE};
use crate::error::{Error, Result};
use crate::pkce::{CODE_CHALLENGE_METHOD, compute_challenge};
use crate::scope::Scopes;
use crate::token::{TokenRequest, TokenRequestExecutor, TokenResponse};
use crate::url::{AuthorizeUrlParams, UrlTrailer, build_authorize_url};

/// Configured PKCE flow. Immutable once built.
#[derive(Debug, Clone)]
pub struct AuthorizationCodeFlowPkce {
    client_id: String,
    redirect_uri: String,
    scopes: Scopes,
    state: Option<String>,
    code_challenge: String,
    code_challenge_method: String,
    authorize_url: String,
    executor: TokenRequestExecutor,
}

impl AuthorizationCodeFlowPkce {
    pub fn builder() -> AuthorizationCodeFlowPkceBuilder {
        AuthorizationCodeFlowPkceBuilder::default()
    }

    /// URL to send the end user to. Pure; the same value every call.
    pub fn construct_url(&self) -> String {
        self.authorize_url.clone()
    }

    /// Exchange the authorization code plus the original verifier for tokens.
    ///
    /// No client secret is sent.
    pub async fn exchange_token(&self, code: &str, code_verifier: &str) -> Result<TokenResponse> {
        self.executor
            .execute(&TokenRequest::AuthorizationCodePkce {
                client_id: &self.client_id,
                code,
                redirect_uri: &self.redirect_uri,
                code_verifier,
            })
            .await
    }

    /// Refresh a PKCE-issued token as a public client (`client_id` in the form).
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.executor
            .execute(&TokenRequest::PublicRefresh {
                client_id: &self.client_id,
                refresh_token,
            })
            .await
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scopes(&self) -> &Scopes {
        &self.scopes
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    pub fn code_challenge_method(&self) -> &str {
        &self.code_challenge_method
    }

    pub fn executor(&self) -> &TokenRequestExecutor {
        &self.executor
    }
}

/// Builder for [`AuthorizationCodeFlowPkce`].
///
/// Required: `client_id`, `redirect_uri`, `scopes`, and `code_challenge`
/// together with `code_challenge_method`. Setting only one of the pair is a
/// configuration error.
#[derive(Debug, Default)]
pub struct AuthorizationCodeFlowPkceBuilder {
    client_id: Option<String>,
    response_type: Option<String>,
    redirect_uri: Option<String>,
    scopes: Option<Scopes>,
    state: Option<String>,
    code_challenge: Option<String>,
    code_challenge_method: Option<String>,
    accounts_base_url: Option<String>,
    executor: Option<TokenRequestExecutor>,
}

impl AuthorizationCodeFlowPkceBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn scopes(mut self, scopes: impl Into<Scopes>) -> Self {
        self.scopes = Some(scopes.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn code_challenge(mut self, code_challenge: impl Into<String>) -> Self {
        self.code_challenge = Some(code_challenge.into());
        self
    }

    pub fn code_challenge_method(mut self, code_challenge_method: impl Into<String>) -> Self {
        self.code_challenge_method = Some(code_challenge_method.into());
        self
    }

    /// Derive an S256 challenge from `code_verifier` and set both fields.
    pub fn code_verifier(self, code_verifier: &str) -> Self {
        self.code_challenge(compute_challenge(code_verifier))
            .code_challenge_method(CODE_CHALLENGE_METHOD)
    }

    /// Base URL for the authorize page (defaults to Spotify's accounts service).
    pub fn accounts_base_url(mut self, accounts_base_url: impl Into<String>) -> Self {
        self.accounts_base_url = Some(accounts_base_url.into());
        self
    }

    pub fn executor(mut self, executor: TokenRequestExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Validate and freeze the configuration.
    pub fn build(self) -> Result<AuthorizationCodeFlowPkce> {
        let client_id = required("client_id", self.client_id)?;
        let response_type = required(
            "response_type",
            Some(
                self.response_type
                    .unwrap_or_else(|| DEFAULT_RESPONSE_TYPE.to_string()),
            ),
        )?;
        let redirect_uri = required("redirect_uri", self.redirect_uri)?;
        let scopes = self
            .scopes
            .ok_or_else(|| Error::InvalidConfiguration("scopes is required".into()))?;

        let (code_challenge, code_challenge_method) =
            match (self.code_challenge, self.code_challenge_method) {
                (Some(challenge), Some(method)) => (
                    required("code_challenge", Some(challenge))?,
                    required("code_challenge_method", Some(method))?,
                ),
                (Some(_), None) => {
                    return Err(Error::InvalidConfiguration(
                        "code_challenge_method must be set together with code_challenge".into(),
                    ));
                }
                (None, Some(_)) => {
                    return Err(Error::InvalidConfiguration(
                        "code_challenge must be set together with code_challenge_method".into(),
                    ));
                }
                (None, None) => {
                    return Err(Error::InvalidConfiguration(
                        "code_challenge and code_challenge_method are required".into(),
                    ));
                }
            };

        let accounts_base_url = self
            .accounts_base_url
            .unwrap_or_else(|| ACCOUNTS_BASE_URL.to_string());

        let authorize_url = build_authorize_url(&AuthorizeUrlParams {
            accounts_base_url: &accounts_base_url,
            client_id: &client_id,
            response_type: &response_type,
            redirect_uri: &redirect_uri,
            scopes: &scopes,
            state: self.state.as_deref(),
            trailer: UrlTrailer::Pkce {
                code_challenge_method: &code_challenge_method,
                code_challenge: &code_challenge,
            },
        })?;

        Ok(AuthorizationCodeFlowPkce {
            client_id,
            redirect_uri,
            scopes,
            state: self.state,
            code_challenge,
            code_challenge_method,
            authorize_url,
            executor: self.executor.unwrap_or_default(),
        })
    }
}
