use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Bearer credential returned by the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Local files come back with `"id": null`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Empty for local files, which have no catalog id.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

impl Track {
    pub fn identity(&self) -> TrackIdentity<'_> {
        TrackIdentity::from(self)
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Name plus the set of credited artist ids.
///
/// Two tracks with equal identities are treated as the same recording even
/// when the catalog gives them different ids (a single and its album cut).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIdentity<'a> {
    pub name: &'a str,
    pub artist_ids: BTreeSet<&'a str>,
}

impl<'a> From<&'a Track> for TrackIdentity<'a> {
    fn from(track: &'a Track) -> Self {
        Self {
            name: &track.name,
            artist_ids: track.artists.iter().map(|a| a.id.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
    /// `null` for entries whose track was removed from the catalog.
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracks {
    pub items: Vec<PlaylistEntry>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// A follow-up page behind `tracks.next`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistEntry>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<PlaylistOwner>,
    pub tracks: PlaylistTracks,
}

impl Playlist {
    /// Tracks in playlist order, skipping removed entries.
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.items.iter().filter_map(|entry| entry.track.as_ref())
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.all_tracks()
            .map(|t| t.id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// How a track was found in a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    /// Matched through another track id with the same identity.
    Alias { track_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistMatch {
    pub playlist_id: String,
    pub kind: MatchKind,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub added: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct EndpointStatsRow {
    pub endpoint: String,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: String,
    pub errored: String,
}

#[derive(Tabled)]
pub struct CacheStatsRow {
    pub cache: String,
    pub entries: usize,
    pub gets: u64,
    pub hits: u64,
    pub new: u64,
    pub overwrites: u64,
    pub tags: String,
}
