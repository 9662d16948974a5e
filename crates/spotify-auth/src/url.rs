//! Authorize URL construction for redirect-based flows
//!
//! Query parameters are emitted in a fixed order: `client_id`,
//! `response_type`, `redirect_uri`, `scope`, `state`, then the
//! flow-specific trailer. Values are inserted verbatim; encoding them is
//! the caller's (or user agent's) business.

use std::fmt::Write;

use crate::constants::authorize_endpoint;
use crate::error::{Error, Result};
use crate::scope::Scopes;

/// Flow-specific parameters appended after `state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTrailer<'a> {
    /// Authorization Code flow: `show_dialog={bool}`
    ShowDialog(bool),
    /// PKCE flow: `code_challenge_method={method}&code_challenge={challenge}`
    Pkce {
        code_challenge_method: &'a str,
        code_challenge: &'a str,
    },
}

/// Everything needed to render an authorize URL.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizeUrlParams<'a> {
    pub accounts_base_url: &'a str,
    pub client_id: &'a str,
    pub response_type: &'a str,
    pub redirect_uri: &'a str,
    pub scopes: &'a Scopes,
    pub state: Option<&'a str>,
    pub trailer: UrlTrailer<'a>,
}

/// Render the authorize URL the end user is sent to.
///
/// Fails with `InvalidConfiguration` when a required value is empty instead
/// of emitting a malformed URL. `scope` is omitted when no scopes were
/// requested and `state` is omitted when unset.
pub fn build_authorize_url(params: &AuthorizeUrlParams<'_>) -> Result<String> {
    require("accounts base URL", params.accounts_base_url)?;
    require("client_id", params.client_id)?;
    require("response_type", params.response_type)?;
    require("redirect_uri", params.redirect_uri)?;

    let mut url = authorize_endpoint(params.accounts_base_url);
    let _ = write!(url, "?client_id={}", params.client_id);
    push_param(&mut url, "response_type", params.response_type);
    push_param(&mut url, "redirect_uri", params.redirect_uri);
    if !params.scopes.is_empty() {
        push_param(&mut url, "scope", params.scopes);
    }
    if let Some(state) = params.state {
        push_param(&mut url, "state", state);
    }

    match params.trailer {
        UrlTrailer::ShowDialog(show_dialog) => push_param(&mut url, "show_dialog", show_dialog),
        UrlTrailer::Pkce {
            code_challenge_method,
            code_challenge,
        } => {
            require("code_challenge_method", code_challenge_method)?;
            require("code_challenge", code_challenge)?;
            push_param(&mut url, "code_challenge_method", code_challenge_method);
            push_param(&mut url, "code_challenge", code_challenge);
        }
    }

    Ok(url)
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidConfiguration(format!("{field} is required")));
    }
    Ok(())
}

// Every parameter after the leading `?client_id=`. Writing into a String
// cannot fail.
fn push_param(url: &mut String, key: &str, value: impl std::fmt::Display) {
    let _ = write!(url, "&{key}={value}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;

    const BASE: &str = "https://accounts.example.com";

    fn params<'a>(scopes: &'a Scopes, trailer: UrlTrailer<'a>) -> AuthorizeUrlParams<'a> {
        AuthorizeUrlParams {
            accounts_base_url: BASE,
            client_id: "abc",
            response_type: "code",
            redirect_uri: "https://example.com/cb",
            scopes,
            state: Some("xyz"),
            trailer,
        }
    }

    #[test]
    fn authorization_code_url_matches_expected_shape() {
        let scopes = Scopes::from([Scope::Streaming, Scope::UserFollowModify]);
        let url = build_authorize_url(&params(&scopes, UrlTrailer::ShowDialog(true))).unwrap();
        assert_eq!(
            url,
            "https://accounts.example.com/authorize?client_id=abc&response_type=code&redirect_uri=https://example.com/cb&scope=streaming user-follow-modify&state=xyz&show_dialog=true"
        );
    }

    #[test]
    fn pkce_url_ends_with_method_then_challenge() {
        let scopes = Scopes::from([Scope::UserReadPrivate]);
        let url = build_authorize_url(&params(
            &scopes,
            UrlTrailer::Pkce {
                code_challenge_method: "S256",
                code_challenge: "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM",
            },
        ))
        .unwrap();
        assert_eq!(
            url,
            "https://accounts.example.com/authorize?client_id=abc&response_type=code&redirect_uri=https://example.com/cb&scope=user-read-private&state=xyz&code_challenge_method=S256&code_challenge=E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
        assert!(!url.contains("show_dialog"));
    }

    #[test]
    fn parameters_appear_in_fixed_order() {
        let scopes = Scopes::from([Scope::UserTopRead]);
        let url = build_authorize_url(&params(&scopes, UrlTrailer::ShowDialog(false))).unwrap();
        let query = url.split_once('?').unwrap().1;
        let keys: Vec<&str> = query
            .split('&')
            .map(|pair| pair.split_once('=').unwrap().0)
            .collect();
        assert_eq!(
            keys,
            ["client_id", "response_type", "redirect_uri", "scope", "state", "show_dialog"]
        );
    }

    #[test]
    fn unset_state_and_empty_scopes_are_omitted() {
        let scopes = Scopes::new();
        let mut p = params(&scopes, UrlTrailer::ShowDialog(false));
        p.state = None;
        let url = build_authorize_url(&p).unwrap();
        assert_eq!(
            url,
            "https://accounts.example.com/authorize?client_id=abc&response_type=code&redirect_uri=https://example.com/cb&show_dialog=false"
        );
    }

    #[test]
    fn base_url_with_query_still_starts_params_with_question_mark() {
        let scopes = Scopes::new();
        let mut p = params(&scopes, UrlTrailer::ShowDialog(false));
        p.accounts_base_url = "https://proxy.example.com/login?next=";
        p.state = None;

        assert_eq!(
            build_authorize_url(&p).unwrap(),
            "https://proxy.example.com/login?next=/authorize?client_id=abc&response_type=code&redirect_uri=https://example.com/cb&show_dialog=false"
        );
    }

    #[test]
    fn missing_required_values_fail_fast() {
        let scopes = Scopes::new();

        let mut p = params(&scopes, UrlTrailer::ShowDialog(false));
        p.client_id = "";
        let err = build_authorize_url(&p).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(msg) if msg.contains("client_id")));

        let mut p = params(&scopes, UrlTrailer::ShowDialog(false));
        p.redirect_uri = "  ";
        assert!(matches!(
            build_authorize_url(&p),
            Err(Error::InvalidConfiguration(_))
        ));

        let p = params(
            &scopes,
            UrlTrailer::Pkce {
                code_challenge_method: "S256",
                code_challenge: "",
            },
        );
        assert!(matches!(
            build_authorize_url(&p),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
