//! Configuration management for trackmark.
//!
//! Configuration is read from environment variables, optionally seeded from a
//! `.env` file in the local data directory. The values end up in an explicit
//! [`ClientConfig`] that is handed to [`crate::spotify::SpotifyClient::new`];
//! nothing in the library reads the environment on its own.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (API and token URLs, report interval)

use std::{env, path::PathBuf, time::Duration};

use crate::{
    cache::CachePolicy,
    error::{Error, Result},
    stats::DEFAULT_STATS_REPORT_INTERVAL,
};

pub const ENV_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const ENV_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const ENV_STATS_INTERVAL: &str = "TRACKMARK_STATS_INTERVAL_SECS";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables
/// from `trackmark/.env` under the platform-specific local data directory:
/// - Linux: `~/.local/share/trackmark/.env`
/// - macOS: `~/Library/Application Support/trackmark/.env`
/// - Windows: `%LOCALAPPDATA%/trackmark/.env`
///
/// A missing `.env` file is not an error; the process environment alone may
/// carry the configuration. Variables already set in the environment win over
/// values from the file.
///
/// # Errors
///
/// Returns [`Error::Config`] if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Config(format!("cannot create {}: {}", parent.display(), e)))?;
    }

    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no .env file found");
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("trackmark/.env");
    path
}

/// Lifetime policy of the client's access token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPolicy {
    /// The first token is kept for the life of the client, even past its
    /// `expires_in`.
    #[default]
    NeverRefresh,
}

/// Everything a [`crate::spotify::SpotifyClient`] needs to talk to Spotify.
#[derive(Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base of the Web API, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    pub token_url: String,
    pub stats_report_interval: Duration,
    pub token_policy: TokenPolicy,
    pub cache_policy: CachePolicy,
}

impl ClientConfig {
    /// Config with default URLs and policies for the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            stats_report_interval: DEFAULT_STATS_REPORT_INTERVAL,
            token_policy: TokenPolicy::default(),
            cache_policy: CachePolicy::default(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_stats_report_interval(mut self, interval: Duration) -> Self {
        self.stats_report_interval = interval;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] first to pick up the `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a credential is missing or empty, or when
    /// the report interval is not a positive number of seconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };

        let mut config = Self::new(required(ENV_CLIENT_ID)?, required(ENV_CLIENT_SECRET)?);

        if let Some(api_url) = lookup(ENV_API_URL) {
            config.api_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(token_url) = lookup(ENV_TOKEN_URL) {
            config.token_url = token_url;
        }
        if let Some(secs) = lookup(ENV_STATS_INTERVAL) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of seconds", ENV_STATS_INTERVAL))
            })?;
            if secs == 0 {
                return Err(Error::Config(format!("{} must be positive", ENV_STATS_INTERVAL)));
            }
            config.stats_report_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("token_url", &self.token_url)
            .field("stats_report_interval", &self.stats_report_interval)
            .field("token_policy", &self.token_policy)
            .field("cache_policy", &self.cache_policy)
            .finish()
    }
}
