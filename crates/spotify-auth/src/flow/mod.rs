//! Grant flows
//!
//! Each flow is an immutable value produced by its builder. Construction
//! validates everything that can be validated locally; after that the flow
//! only reads its configuration.
//!
//! - [`AuthorizationCodeFlow`]: confidential client, user consent redirect
//! - [`AuthorizationCodeFlowPkce`]: public client, code verifier instead of secret
//! - [`ClientCredentialsFlow`]: app-only token, no user involved

mod authorization_code;
mod authorization_code_pkce;
mod client_credentials;

pub use authorization_code::{AuthorizationCodeFlow, AuthorizationCodeFlowBuilder};
pub use authorization_code_pkce::{AuthorizationCodeFlowPkce, AuthorizationCodeFlowPkceBuilder};
pub use client_credentials::ClientCredentialsFlow;

use common::Secret;

use crate::error::{Error, Result};

/// Take a required builder field, rejecting absent or blank values.
fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(Error::InvalidConfiguration(format!(
            "{field} must not be empty"
        ))),
        None => Err(Error::InvalidConfiguration(format!("{field} is required"))),
    }
}

/// Same as [`required`] for secret values; the value never appears in errors.
fn required_secret(field: &'static str, value: Option<Secret<String>>) -> Result<Secret<String>> {
    match value {
        Some(value) if !value.expose().trim().is_empty() => Ok(value),
        Some(_) => Err(Error::InvalidConfiguration(format!(
            "{field} must not be empty"
        ))),
        None => Err(Error::InvalidConfiguration(format!("{field} is required"))),
    }
}
