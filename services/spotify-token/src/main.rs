//! Spotify token CLI
//!
//! Single-binary tool that drives the Spotify authorization flows:
//! 1. Prints the authorize URL (confidential or PKCE) for a user to visit
//! 2. Exchanges the returned code for tokens
//! 3. Refreshes user tokens and requests app-only tokens
//!
//! Logs go to stderr as JSON; command output goes to stdout.

mod commands;
mod config;
mod error;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::Command;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    // CLI: simple --config flag parsing
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        client_id = %config.spotify.client_id,
        redirect_uri = %config.spotify.redirect_uri,
        accounts_base_url = %config.spotify.accounts_base_url,
        scopes = config.spotify.scopes.len(),
        has_client_secret = config.spotify.client_secret.is_some(),
        "configuration loaded"
    );

    let output = commands::run(&command, &config.spotify).await?;
    println!("{output}");

    info!(command = command.name(), "done");
    Ok(())
}
