//! # Spotify Integration Module
//!
//! This module is the access layer between trackmark and the Spotify Web API.
//! It owns authentication, HTTP dispatch, pagination, the track cache and the
//! track identity resolution used to decide whether a track is already part
//! of a playlist.
//!
//! ## Architecture
//!
//! ```text
//! Caller (CLI)
//!          ↓
//! SpotifyClient
//!     ├── Authentication (client-credentials, single-flight)
//!     ├── Dispatch (per-endpoint request stats)
//!     ├── Tracks (cache-first lookups)
//!     ├── Playlists (pagination, cache population)
//!     └── Matching (exact and alias identity checks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! [`auth`] implements the client-credentials grant. The token is requested
//! lazily on the first authenticated call. Callers that arrive while the
//! request is in flight join it instead of issuing their own. The token is
//! never refreshed (see [`crate::config::TokenPolicy`]).
//!
//! ## Request Statistics
//!
//! Every request is counted per [`EndpointKey`] (method plus the first two
//! path segments): attempts, successes, failures by status code and transport
//! errors by kind. The counters are reported periodically through
//! [`crate::stats::StatsReporter`] and can be read with
//! [`SpotifyClient::request_stats`].
//!
//! ## Error Handling
//!
//! Nothing is retried. Transport failures, non-success responses and decode
//! failures are returned to the caller as [`crate::error::Error`] variants.
//! Rate limiting (429) surfaces as an ordinary upstream error.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials token
//! - `GET /tracks/{id}` - a single track
//! - `GET /playlists/{id}` - a playlist with its first page of tracks
//! - `tracks.next` links - follow-up pages of playlist tracks
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = SpotifyClient::new(ClientConfig::from_env()?)?;
//! let playlists = client.get_playlists(&["76OCVnnBFLGwroNqfEo8IU".into()]).await?;
//! let found = client
//!     .match_against_playlists("4uLU6hMCjMI75M1A2tKUQC", &playlists, true)
//!     .await?;
//! ```

pub mod auth;
pub mod matching;
pub mod playlists;
pub mod request;
pub mod stats;
pub mod tracks;

use std::{collections::BTreeMap, sync::Arc, sync::Mutex};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

pub use matching::{find_alias, track_id_in_playlist};
pub use playlists::TAG_FROM_PLAYLIST_FETCH;
pub use request::FetchOptions;
pub use stats::{EndpointKey, RequestStats};
pub use tracks::TAG_FROM_TRACK_FETCH;

use crate::{
    cache::Cache,
    config::ClientConfig,
    error::{Error, Result},
    stats::{self as reporting, ReportHandle, StatsReporter},
    types::Track,
};
use auth::TokenSlot;
use stats::RequestStatsRegistry;

/// Name of the client's track cache in stats reports.
pub const TRACK_CACHE_NAME: &str = "TrackCache";

/// Authenticated, instrumented client for the Spotify Web API.
///
/// All methods take `&self`; the client can be shared between tasks behind
/// an `Arc`.
pub struct SpotifyClient {
    http: Client,
    config: Arc<ClientConfig>,
    token: Mutex<TokenSlot>,
    request_stats: Arc<RequestStatsRegistry>,
    track_cache: Cache<Track>,
    reporter: ReportHandle,
}

impl SpotifyClient {
    /// Builds a client and starts its stats reporters.
    ///
    /// No request is made here; the access token is fetched on first use.
    ///
    /// # Errors
    ///
    /// - [`Error::HttpClient`] if the HTTP client cannot be built
    /// - [`Error::InvalidInput`] if the report interval is zero
    /// - [`Error::NoRuntime`] if called outside a tokio runtime
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("trackmark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::HttpClient)?;

        let request_stats = Arc::new(RequestStatsRegistry::new(
            reporting::reporter_name::<Self>(None),
        ));
        let reporter =
            ReportHandle::start(Arc::clone(&request_stats), config.stats_report_interval)?;
        let track_cache = Cache::with_policy(
            Some(TRACK_CACHE_NAME),
            config.cache_policy,
            config.stats_report_interval,
        )?;

        debug!(api_url = %config.api_url, token_url = %config.token_url, "built Spotify client");

        Ok(Self {
            http,
            config: Arc::new(config),
            token: Mutex::new(TokenSlot::new()),
            request_stats,
            track_cache,
            reporter,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request and deserializes the JSON response body.
    ///
    /// With `require_access_token`, the client's token is resolved first and
    /// sent as a bearer credential. `url` must be absolute; pagination links
    /// returned by the API can be passed as they are.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] if the token could not be obtained
    /// - [`Error::Transport`] if no response was received
    /// - [`Error::Upstream`] for non-success responses
    /// - [`Error::Decode`] if the body does not match `R`
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        url: &str,
        options: FetchOptions,
        require_access_token: bool,
    ) -> Result<R> {
        let token = if require_access_token {
            Some(self.access_token().await?)
        } else {
            None
        };

        let body =
            request::dispatch(&self.http, &self.request_stats, url, options, token.as_ref()).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Snapshot of the per-endpoint request counters.
    pub fn request_stats(&self) -> BTreeMap<EndpointKey, RequestStats> {
        self.request_stats.stats()
    }

    pub fn track_cache(&self) -> &Cache<Track> {
        &self.track_cache
    }

    /// Emits a report for the request stats and the track cache right away.
    pub fn report_stats(&self) {
        self.request_stats.report_stats();
        self.track_cache.report_stats();
    }

    /// Stops the periodic stats reports of the client and its cache.
    pub fn shutdown(&self) {
        self.reporter.stop();
        self.track_cache.stop_reporting();
    }

    fn api_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

/// Catalog ids are base62; nothing else may be pasted into a request path.
fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidInput(format!("invalid {} id: {:?}", kind, id)));
    }
    Ok(())
}
