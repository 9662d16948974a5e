//! Configuration types and loading
//!
//! Config path precedence: `--config` arg > `CONFIG_PATH` env var > default.
//! The client secret is loaded from the `SPOTIFY_CLIENT_SECRET` env var or
//! `client_secret_file`, never stored in the TOML directly to avoid leaking
//! it through config repositories.

use std::path::{Path, PathBuf};

use common::Secret;
use serde::Deserialize;
use spotify_auth::{ACCOUNTS_BASE_URL, Scope, Scopes};

/// Environment variable holding the client secret
pub const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
}

/// Spotify application settings
#[derive(Debug, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to the env var)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
    pub redirect_uri: String,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    #[serde(default)]
    pub show_dialog: bool,
    #[serde(default = "default_accounts_base_url")]
    pub accounts_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SpotifyConfig {
    /// Configured scopes in file order, duplicates dropped.
    pub fn scopes(&self) -> Scopes {
        self.scopes.iter().copied().collect()
    }
}

fn default_accounts_base_url() -> String {
    ACCOUNTS_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. SPOTIFY_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        let spotify = &mut config.spotify;

        if spotify.client_id.trim().is_empty() {
            return Err(common::Error::invalid("client_id", "must not be empty"));
        }

        if !is_http_url(&spotify.redirect_uri) {
            return Err(common::Error::invalid(
                "redirect_uri",
                format!(
                    "must start with http:// or https://, got: {}",
                    spotify.redirect_uri
                ),
            ));
        }

        if !is_http_url(&spotify.accounts_base_url) {
            return Err(common::Error::invalid(
                "accounts_base_url",
                format!(
                    "must start with http:// or https://, got: {}",
                    spotify.accounts_base_url
                ),
            ));
        }

        if spotify.timeout_secs == 0 {
            return Err(common::Error::invalid(
                "timeout_secs",
                "must be greater than 0",
            ));
        }

        // Env var takes precedence over file
        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            spotify.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = spotify.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                spotify.client_secret = Some(Secret::new(secret));
            }
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("spotify-token.toml")
    }
}
