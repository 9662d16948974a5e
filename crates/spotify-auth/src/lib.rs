//! Spotify Web API authorization library
//!
//! OAuth2 grant flows against the Spotify accounts service: Authorization
//! Code, Authorization Code with PKCE, Client Credentials, and the refresh
//! grant shared by the redirect-based flows. Resource endpoint wrappers are
//! out of scope; they only need [`TokenResponse::bearer`].
//!
//! Authorization Code flow:
//! 1. Build an [`AuthorizationCodeFlow`] (client id/secret, redirect URI, scopes)
//! 2. Redirect the user to [`AuthorizationCodeFlow::construct_url`]
//! 3. Call [`AuthorizationCodeFlow::exchange_token`] with the returned code
//! 4. Later, [`AuthorizationCodeFlow::refresh_token`]
//!
//! PKCE flow: same steps with [`AuthorizationCodeFlowPkce`], a verifier from
//! [`pkce::generate_verifier`], and no client secret.
//!
//! Every token request goes through one [`TokenRequestExecutor`]: transport
//! failures surface as [`Error::HttpRequestFailed`], anything the accounts
//! service refused as [`Error::AuthorizationFailed`].

pub mod constants;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod metrics;
pub mod pkce;
pub mod scope;
pub mod token;
pub mod transport;
pub mod url;

#[cfg(test)]
mod testing;

pub use constants::*;
pub use error::{Error, Result};
pub use flow::{
    AuthorizationCodeFlow, AuthorizationCodeFlowBuilder, AuthorizationCodeFlowPkce,
    AuthorizationCodeFlowPkceBuilder, ClientCredentialsFlow,
};
pub use pkce::{CODE_CHALLENGE_METHOD, compute_challenge, generate_state, generate_verifier};
pub use scope::{Scope, Scopes};
pub use token::{TokenRequest, TokenRequestExecutor, TokenResponse};
pub use transport::{FormRequest, ReqwestTransport, Transport, TransportError, TransportResponse};
pub use url::{AuthorizeUrlParams, UrlTrailer, build_authorize_url};
