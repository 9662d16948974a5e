//! Command parsing and dispatch
//!
//! Each command drives one grant flow from `spotify_auth` and returns the
//! text to print: the authorize URL (plus state/verifier to keep) or the
//! token response as pretty JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::Secret;
use spotify_auth::{
    AuthorizationCodeFlow, AuthorizationCodeFlowPkce, ClientCredentialsFlow, ReqwestTransport,
    TokenRequest, TokenRequestExecutor, TokenResponse, generate_state, generate_verifier,
    token_endpoint,
};
use tracing::info;

use crate::config::SpotifyConfig;
use crate::error::Error;

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AuthorizeUrl { pkce: bool },
    Exchange {
        code: String,
        verifier: Option<String>,
    },
    Refresh { refresh_token: String },
    ClientCredentials,
}

impl Command {
    /// Parse arguments (program name excluded). `--config <path>` may appear
    /// anywhere and is ignored here.
    pub fn parse(args: &[String]) -> crate::error::Result<Self> {
        let mut rest: Vec<&str> = Vec::with_capacity(args.len());
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--config" {
                iter.next()
                    .ok_or_else(|| Error::usage("--config needs a path"))?;
                continue;
            }
            rest.push(arg);
        }

        match rest.as_slice() {
            ["authorize-url"] => Ok(Self::AuthorizeUrl { pkce: false }),
            ["authorize-url", "--pkce"] => Ok(Self::AuthorizeUrl { pkce: true }),
            ["exchange", code] => Ok(Self::Exchange {
                code: code.to_string(),
                verifier: None,
            }),
            ["exchange", code, "--verifier", verifier] => Ok(Self::Exchange {
                code: code.to_string(),
                verifier: Some(verifier.to_string()),
            }),
            ["refresh", refresh_token] => Ok(Self::Refresh {
                refresh_token: refresh_token.to_string(),
            }),
            ["client-credentials"] => Ok(Self::ClientCredentials),
            [] => Err(Error::usage("missing command")),
            [command, ..] => Err(Error::usage(format!(
                "unrecognized arguments for `{command}`"
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthorizeUrl { .. } => "authorize-url",
            Self::Exchange { .. } => "exchange",
            Self::Refresh { .. } => "refresh",
            Self::ClientCredentials => "client-credentials",
        }
    }
}

/// Run a command against the configured accounts service.
pub async fn run(command: &Command, config: &SpotifyConfig) -> anyhow::Result<String> {
    let executor = executor(config)?;
    info!(
        command = command.name(),
        token_endpoint = executor.token_endpoint(),
        "running command"
    );

    match command {
        Command::AuthorizeUrl { pkce: false } => {
            let state = generate_state();
            let flow = confidential_flow(config, command, executor)?
                .state(state.clone())
                .build()?;
            Ok(format!("{}\nstate: {state}", flow.construct_url()))
        }
        Command::AuthorizeUrl { pkce: true } => {
            let state = generate_state();
            let verifier = generate_verifier();
            let flow = public_flow(config, &verifier, executor)
                .state(state.clone())
                .build()?;
            Ok(format!(
                "{}\nstate: {state}\nverifier: {verifier}",
                flow.construct_url()
            ))
        }
        Command::Exchange {
            code,
            verifier: None,
        } => {
            let flow = confidential_flow(config, command, executor)?.build()?;
            render(&flow.exchange_token(code).await?)
        }
        Command::Exchange {
            code,
            verifier: Some(verifier),
        } => {
            let flow = public_flow(config, verifier, executor).build()?;
            render(&flow.exchange_token(code, verifier).await?)
        }
        Command::Refresh { refresh_token } => {
            // Without a secret the token came from a PKCE login
            let token = match &config.client_secret {
                Some(secret) => {
                    executor
                        .refresh(&config.client_id, secret.expose(), refresh_token)
                        .await?
                }
                None => {
                    executor
                        .execute(&TokenRequest::PublicRefresh {
                            client_id: &config.client_id,
                            refresh_token,
                        })
                        .await?
                }
            };
            render(&token)
        }
        Command::ClientCredentials => {
            let secret = client_secret(config, command)?;
            let mut flow = ClientCredentialsFlow::new(executor);
            let token = flow.request_token(&config.client_id, secret.expose()).await?;
            render(&token)
        }
    }
}

fn executor(config: &SpotifyConfig) -> anyhow::Result<TokenRequestExecutor> {
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(config.timeout_secs))
        .context("failed to build HTTP transport")?;
    Ok(TokenRequestExecutor::new(Arc::new(transport))
        .with_token_endpoint(token_endpoint(&config.accounts_base_url)))
}

fn client_secret<'a>(
    config: &'a SpotifyConfig,
    command: &Command,
) -> crate::error::Result<&'a Secret<String>> {
    config
        .client_secret
        .as_ref()
        .ok_or(Error::MissingClientSecret(command.name()))
}

fn confidential_flow(
    config: &SpotifyConfig,
    command: &Command,
    executor: TokenRequestExecutor,
) -> crate::error::Result<spotify_auth::AuthorizationCodeFlowBuilder> {
    let secret = client_secret(config, command)?;
    Ok(AuthorizationCodeFlow::builder()
        .client_id(config.client_id.clone())
        .client_secret(secret.clone())
        .redirect_uri(config.redirect_uri.clone())
        .scopes(config.scopes())
        .show_dialog(config.show_dialog)
        .accounts_base_url(config.accounts_base_url.clone())
        .executor(executor))
}

fn public_flow(
    config: &SpotifyConfig,
    verifier: &str,
    executor: TokenRequestExecutor,
) -> spotify_auth::AuthorizationCodeFlowPkceBuilder {
    AuthorizationCodeFlowPkce::builder()
        .client_id(config.client_id.clone())
        .redirect_uri(config.redirect_uri.clone())
        .scopes(config.scopes())
        .code_verifier(verifier)
        .accounts_base_url(config.accounts_base_url.clone())
        .executor(executor)
}

fn render(token: &TokenResponse) -> anyhow::Result<String> {
    serde_json::to_string_pretty(token).context("failed to serialize token response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use spotify_auth::Scope;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config(accounts_base_url: &str, secret: Option<&str>) -> SpotifyConfig {
        SpotifyConfig {
            client_id: "abc".into(),
            client_secret: secret.map(|s| Secret::new(s.to_string())),
            client_secret_file: None,
            redirect_uri: "https://example.com/cb".into(),
            scopes: vec![Scope::Streaming, Scope::UserFollowModify],
            show_dialog: true,
            accounts_base_url: accounts_base_url.into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn parse_recognizes_every_command() {
        assert_eq!(
            Command::parse(&args(&["authorize-url"])).unwrap(),
            Command::AuthorizeUrl { pkce: false }
        );
        assert_eq!(
            Command::parse(&args(&["--config", "x.toml", "authorize-url", "--pkce"])).unwrap(),
            Command::AuthorizeUrl { pkce: true }
        );
        assert_eq!(
            Command::parse(&args(&["exchange", "c1", "--verifier", "v1"])).unwrap(),
            Command::Exchange {
                code: "c1".into(),
                verifier: Some("v1".into())
            }
        );
        assert_eq!(
            Command::parse(&args(&["refresh", "r1", "--config", "x.toml"])).unwrap(),
            Command::Refresh {
                refresh_token: "r1".into()
            }
        );
        assert_eq!(
            Command::parse(&args(&["client-credentials"])).unwrap(),
            Command::ClientCredentials
        );
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        for bad in [
            args(&[]),
            args(&["login"]),
            args(&["exchange"]),
            args(&["refresh", "r1", "extra"]),
            args(&["client-credentials", "--config"]),
        ] {
            assert!(
                matches!(Command::parse(&bad), Err(Error::Usage(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn authorize_url_prints_url_and_state() {
        let output = run(
            &Command::AuthorizeUrl { pkce: false },
            &config("https://accounts.example.com", Some("def")),
        )
        .await
        .unwrap();

        let mut lines = output.lines();
        let url = lines.next().unwrap();
        assert!(url.starts_with(
            "https://accounts.example.com/authorize?client_id=abc&response_type=code&redirect_uri=https://example.com/cb&scope=streaming user-follow-modify&state="
        ));
        assert!(url.ends_with("&show_dialog=true"));
        let state = lines.next().unwrap().strip_prefix("state: ").unwrap();
        assert!(url.contains(&format!("&state={state}&")));
    }

    #[tokio::test]
    async fn pkce_authorize_url_prints_verifier_matching_challenge() {
        let output = run(
            &Command::AuthorizeUrl { pkce: true },
            &config("https://accounts.example.com", None),
        )
        .await
        .unwrap();

        let verifier = output
            .lines()
            .find_map(|line| line.strip_prefix("verifier: "))
            .unwrap();
        let challenge = spotify_auth::compute_challenge(verifier);
        assert!(output.contains(&format!(
            "&code_challenge_method=S256&code_challenge={challenge}"
        )));
    }

    #[tokio::test]
    async fn confidential_commands_require_a_secret() {
        let err = run(
            &Command::ClientCredentials,
            &config("https://accounts.example.com", None),
        )
        .await
        .unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<Error>(),
                Some(Error::MissingClientSecret("client-credentials"))
            ),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn client_credentials_prints_token_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/token")
            .match_header("authorization", "Basic YWJjOmRlZg==")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"app1","token_type":"Bearer","expires_in":3600}"#)
            .create_async()
            .await;

        let output = run(&Command::ClientCredentials, &config(&server.url(), Some("def")))
            .await
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["access_token"], "app1");
        assert!(json.get("refresh_token").is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn refresh_without_secret_uses_public_client_form() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/token")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
                Matcher::UrlEncoded("refresh_token".into(), "r1".into()),
                Matcher::UrlEncoded("client_id".into(), "abc".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"a2","token_type":"Bearer","expires_in":3600,"refresh_token":"r2"}"#)
            .create_async()
            .await;

        let output = run(
            &Command::Refresh {
                refresh_token: "r1".into(),
            },
            &config(&server.url(), None),
        )
        .await
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["refresh_token"], "r2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_exchange_surfaces_authorization_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid authorization code"}"#)
            .create_async()
            .await;

        let err = run(
            &Command::Exchange {
                code: "stale".into(),
                verifier: None,
            },
            &config(&server.url(), Some("def")),
        )
        .await
        .unwrap_err();

        assert!(
            matches!(
                err.downcast_ref::<spotify_auth::Error>(),
                Some(spotify_auth::Error::AuthorizationFailed(_))
            ),
            "got: {err:?}"
        );
    }
}
