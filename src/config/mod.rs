pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

use crate::settings::{API_KEY, TOKEN};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Default config file locations, in lookup order.
pub const DEFAULT_PATHS: [&str; 4] = [
    "./cineref.toml",
    "./config.toml",
    "~/.config/cineref/config.toml",
    "/etc/cineref/config.toml",
];

/// Locate the config file to use: the custom path if given, else the first
/// default location that exists.
pub fn find_config_path(custom_path: Option<&Path>) -> Option<std::path::PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }

    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        path.exists().then(|| path.to_path_buf())
    })
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match find_config_path(custom_path) {
        Some(path) => load_config(&path),
        None => {
            tracing::info!("No config file found; using defaults");
            Ok(Config::default())
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let public_url = reqwest::Url::parse(&config.server.public_url)
        .with_context(|| format!("server.public_url is not a URL: {}", config.server.public_url))?;
    if public_url.cannot_be_a_base() {
        anyhow::bail!("server.public_url must be an absolute http(s) URL");
    }

    if config.tmdb.requests_per_second == 0 {
        anyhow::bail!("tmdb.requests_per_second must be at least 1");
    }

    if config.tmdb.timeout_secs == 0 {
        anyhow::bail!("tmdb.timeout_secs must be at least 1");
    }

    let has_user_token = config.users.values().any(|u| u.contains_key(TOKEN));
    if !config.settings.contains_key(API_KEY) && !has_user_token {
        tracing::warn!("No TMDB credentials configured; movie links will use generic previews");
    }

    Ok(())
}
