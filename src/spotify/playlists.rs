use futures::future::try_join_all;
use tracing::debug;

use super::{FetchOptions, SpotifyClient, require_id};
use crate::{
    error::Result,
    types::{Playlist, PlaylistTracksPage},
};

/// Cache tag for tracks learned from a playlist.
pub const TAG_FROM_PLAYLIST_FETCH: &str = "fromCollectionFetch";

impl SpotifyClient {
    /// Retrieves a playlist together with all of its tracks.
    ///
    /// `GET /playlists/{id}` only embeds the first page of tracks. The
    /// `tracks.next` links are followed until none is left and every page is
    /// appended in order, so the returned playlist always holds the complete
    /// track list and `tracks.next` is `None`.
    ///
    /// Once assembled, every track is written into the track cache tagged
    /// [`TAG_FROM_PLAYLIST_FETCH`], replacing what an earlier single-track
    /// fetch may have stored. Removed entries and local files are skipped.
    ///
    /// # Errors
    ///
    /// An id that is not base62 is rejected with
    /// [`crate::error::Error::InvalidInput`]. Any page failing fails the whole
    /// call; nothing is cached in that case.
    pub async fn get_playlist(&self, id: &str) -> Result<Playlist> {
        require_id("playlist", id)?;

        let url = self.api_endpoint(&format!("playlists/{}", id));
        let mut playlist: Playlist = self.fetch(&url, FetchOptions::get(), true).await?;

        let mut pages = 1;
        while let Some(next) = playlist.tracks.next.take() {
            let page: PlaylistTracksPage = self.fetch(&next, FetchOptions::get(), true).await?;
            playlist.tracks.items.extend(page.items);
            playlist.tracks.next = page.next;
            pages += 1;
        }

        for track in playlist.all_tracks().filter(|t| !t.id.is_empty()) {
            self.track_cache
                .add(track.id.clone(), track.clone(), Some(TAG_FROM_PLAYLIST_FETCH));
        }

        debug!(
            id,
            pages,
            tracks = playlist.tracks.items.len(),
            "fetched playlist"
        );
        Ok(playlist)
    }

    /// Fetches several playlists concurrently.
    ///
    /// The result keeps the order of `ids`. The first failure aborts the call.
    pub async fn get_playlists(&self, ids: &[String]) -> Result<Vec<(String, Playlist)>> {
        try_join_all(ids.iter().map(|id| async move {
            let playlist = self.get_playlist(id).await?;
            Ok::<_, crate::error::Error>((id.clone(), playlist))
        }))
        .await
    }
}
