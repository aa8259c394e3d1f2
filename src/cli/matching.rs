use super::spinner;
use crate::{
    error, info,
    spotify::SpotifyClient,
    success,
    types::{MatchKind, Playlist},
    warning,
};

/// Reports the first of `playlist_ids` (in the given order) containing the track.
///
/// All playlists are fetched before resolving, the same way a long-running
/// caller would keep them loaded. With `check_aliases`, tracks with the same
/// name and artists but a different id count as a match.
pub async fn match_track(
    client: &SpotifyClient,
    track_id: &str,
    playlist_ids: &[String],
    check_aliases: bool,
) {
    let pb = spinner(format!("Fetching {} playlists...", playlist_ids.len()));
    let result = client.get_playlists(playlist_ids).await;
    pb.finish_and_clear();

    let playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to fetch playlists: {}", e),
    };

    info!(
        "Fetched playlist data for {} playlists: {}",
        playlists.len(),
        playlists
            .iter()
            .map(|(_, p)| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let found = match client
        .resolve_playlist_match(track_id, &playlists, check_aliases)
        .await
    {
        Ok(found) => found,
        Err(e) => error!("Failed to resolve track {}: {}", track_id, e),
    };

    let Some(found) = found else {
        warning!("Track {} is not in any of the given playlists", track_id);
        return;
    };

    let name = playlist_name(&playlists, &found.playlist_id);
    match found.kind {
        MatchKind::Exact => success!("Track {} is in playlist {}", track_id, name),
        MatchKind::Alias { track_id: alias } => {
            success!("Track {} is in playlist {} as {}", track_id, name, alias)
        }
    }
}

fn playlist_name<'a>(playlists: &'a [(String, Playlist)], id: &'a str) -> &'a str {
    playlists
        .iter()
        .find(|(playlist_id, _)| playlist_id == id)
        .map(|(_, playlist)| playlist.name.as_str())
        .unwrap_or(id)
}
