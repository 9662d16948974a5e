//! Authorization Code flow (confidential client)
//!
//! 1. Build the flow with client credentials, redirect URI and scopes
//! 2. Send the user to `construct_url()`
//! 3. Spotify redirects back with `code` (and the `state` you supplied)
//! 4. `exchange_token(code)` trades the code for tokens using Basic auth
//! 5. `refresh_token(refresh)` renews the access token later

use common::Secret;

use super::{required, required_secret};
use crate::constants::{ACCOUNTS_BASE_URL, DEFAULT_RESPONSE_TYPE};
use crate::error::{Error, Result};
use crate::scope::Scopes;
use crate::token::{TokenRequest, TokenRequestExecutor, TokenResponse};
use crate::url::{AuthorizeUrlParams, UrlTrailer, build_authorize_url};

/// Configured Authorization Code flow. Immutable once built.
#[derive(Debug, Clone)]
pub struct AuthorizationCodeFlow {
    client_id: String,
    client_secret: Secret<String>,
    redirect_uri: String,
    scopes: Scopes,
    state: Option<String>,
    show_dialog: bool,
    authorize_url: String,
    executor: TokenRequestExecutor,
}

impl AuthorizationCodeFlow {
    pub fn builder() -> AuthorizationCodeFlowBuilder {
        AuthorizationCodeFlowBuilder::default()
    }

    /// URL to send the end user to. Pure; the same value every call.
    pub fn construct_url(&self) -> String {
        self.authorize_url.clone()
    }

    /// Exchange the authorization code from the redirect for tokens.
    pub async fn exchange_token(&self, code: &str) -> Result<TokenResponse> {
        self.executor
            .execute(&TokenRequest::AuthorizationCode {
                client_id: &self.client_id,
                client_secret: self.client_secret.expose(),
                code,
                redirect_uri: &self.redirect_uri,
            })
            .await
    }

    /// Refresh an access token issued through this flow.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.executor
            .refresh(&self.client_id, self.client_secret.expose(), refresh_token)
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

    pub fn show_dialog(&self) -> bool {
        self.show_dialog
    }

    pub fn executor(&self) -> &TokenRequestExecutor {
        &self.executor
    }
}

/// Builder for [`AuthorizationCodeFlow`].
///
/// Required: `client_id`, `client_secret`, `redirect_uri`, `scopes`.
/// `response_type` defaults to `code`, `show_dialog` to `false`, `state` to
/// unset, and the executor to Spotify's token endpoint over reqwest.
#[derive(Debug, Default)]
pub struct AuthorizationCodeFlowBuilder {
    client_id: Option<String>,
    client_secret: Option<Secret<String>>,
    response_type: Option<String>,
    redirect_uri: Option<String>,
    scopes: Option<Scopes>,
    state: Option<String>,
    show_dialog: bool,
    accounts_base_url: Option<String>,
    executor: Option<TokenRequestExecutor>,
}

impl AuthorizationCodeFlowBuilder {
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<Secret<String>>) -> Self {
        self.client_secret = Some(client_secret.into());
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

    pub fn show_dialog(mut self, show_dialog: bool) -> Self {
        self.show_dialog = show_dialog;
        self
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
    pub fn build(self) -> Result<AuthorizationCodeFlow> {
        let client_id = required("client_id", self.client_id)?;
        let client_secret = required_secret("client_secret", self.client_secret)?;
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
            trailer: UrlTrailer::ShowDialog(self.show_dialog),
        })?;

        Ok(AuthorizationCodeFlow {
            client_id,
            client_secret,
            redirect_uri,
            scopes,
            state: self.state,
            show_dialog: self.show_dialog,
            authorize_url,
            executor: self.executor.unwrap_or_default(),
        })
    }
}
