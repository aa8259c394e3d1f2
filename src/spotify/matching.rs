//! Track identity resolution.
//!
//! The catalog frequently carries the same recording under several track ids,
//! e.g. once as a single and once on the album. An exact id check therefore
//! under-matches; the alias check falls back to comparing [`TrackIdentity`]
//! (name plus artist-id set).
//!
//! [`TrackIdentity`]: crate::types::TrackIdentity

use tracing::debug;

use super::SpotifyClient;
use crate::{
    error::{Error, Result},
    types::{MatchKind, Playlist, PlaylistMatch, Track},
};

/// True if `track_id` appears verbatim among the playlist's track ids.
pub fn track_id_in_playlist(track_id: &str, playlist: &Playlist) -> bool {
    playlist.track_ids().any(|id| id == track_id)
}

/// First track of the playlist, in playlist order, with the same name and
/// exactly the same set of artist ids as `track`.
///
/// Partial artist overlap (a remix crediting one more artist) does not match.
pub fn find_alias<'a>(track: &Track, playlist: &'a Playlist) -> Option<&'a Track> {
    let identity = track.identity();
    playlist
        .all_tracks()
        .find(|candidate| candidate.identity() == identity)
}

impl SpotifyClient {
    /// Alias check of `track_id` against one playlist.
    ///
    /// Fetches the track (cache first) and scans the playlist with
    /// [`find_alias`].
    pub async fn alias_match(&self, track_id: &str, playlist: &Playlist) -> Result<bool> {
        let track = self.get_track(track_id).await?;
        Ok(find_alias(&track, playlist).is_some())
    }

    /// Finds the first playlist, in the given priority order, containing the track.
    ///
    /// Each playlist is first checked by exact id; only if that fails and
    /// `check_aliases` is set is the alias check tried. The answer is always
    /// the earliest matching position in `playlists`, never a later one.
    ///
    /// Returns `Ok(None)` when no playlist matches.
    ///
    /// # Errors
    ///
    /// A failing alias check aborts the whole resolution with
    /// [`Error::AliasMatch`] naming the playlist being checked.
    pub async fn match_against_playlists(
        &self,
        track_id: &str,
        playlists: &[(String, Playlist)],
        check_aliases: bool,
    ) -> Result<Option<String>> {
        let found = self
            .resolve_playlist_match(track_id, playlists, check_aliases)
            .await?;
        Ok(found.map(|m| m.playlist_id))
    }

    /// Same as [`SpotifyClient::match_against_playlists`], but also tells
    /// whether the match was exact or through an alias.
    ///
    /// The track itself is fetched at most once, and only when an alias check
    /// is reached.
    pub async fn resolve_playlist_match(
        &self,
        track_id: &str,
        playlists: &[(String, Playlist)],
        check_aliases: bool,
    ) -> Result<Option<PlaylistMatch>> {
        let mut track: Option<Track> = None;

        for (playlist_id, playlist) in playlists {
            if track_id_in_playlist(track_id, playlist) {
                debug!(track_id, playlist_id, "exact match");
                return Ok(Some(PlaylistMatch {
                    playlist_id: playlist_id.clone(),
                    kind: MatchKind::Exact,
                }));
            }

            if !check_aliases {
                continue;
            }

            if track.is_none() {
                let fetched = self
                    .get_track(track_id)
                    .await
                    .map_err(|source| Error::AliasMatch {
                        playlist_id: playlist_id.clone(),
                        source: Box::new(source),
                    })?;
                track = Some(fetched);
            }

            if let Some(alias) = track.as_ref().and_then(|t| find_alias(t, playlist)) {
                debug!(track_id, playlist_id, alias_id = %alias.id, "alias match");
                return Ok(Some(PlaylistMatch {
                    playlist_id: playlist_id.clone(),
                    kind: MatchKind::Alias {
                        track_id: alias.id.clone(),
                    },
                }));
            }
        }

        Ok(None)
    }
}
