use tracing::trace;

use super::{FetchOptions, SpotifyClient, require_id};
use crate::{error::Result, types::Track};

/// Cache tag for tracks fetched one by one.
pub const TAG_FROM_TRACK_FETCH: &str = "fromItemFetch";

impl SpotifyClient {
    /// Retrieves a single track, serving it from the track cache when possible.
    ///
    /// On a cache hit no request is made. On a miss the track is fetched from
    /// `GET /tracks/{id}` and cached under the requested id, tagged
    /// [`TAG_FROM_TRACK_FETCH`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidInput`] for an id that is not
    /// base62, otherwise any error from [`SpotifyClient::fetch`].
    pub async fn get_track(&self, id: &str) -> Result<Track> {
        require_id("track", id)?;

        if let Some(track) = self.track_cache.get(id) {
            trace!(id, "track cache hit");
            return Ok(track);
        }

        let url = self.api_endpoint(&format!("tracks/{}", id));
        let track: Track = self.fetch(&url, FetchOptions::get(), true).await?;
        self.track_cache.add(id, track.clone(), Some(TAG_FROM_TRACK_FETCH));

        Ok(track)
    }
}
