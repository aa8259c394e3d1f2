use tabled::Table;

use super::spinner;
use crate::{error, info, spotify::SpotifyClient, utils, warning};

pub async fn show_playlist(client: &SpotifyClient, id: &str) {
    let pb = spinner(format!("Fetching playlist {}...", id));
    let result = client.get_playlist(id).await;
    pb.finish_and_clear();

    let playlist = match result {
        Ok(playlist) => playlist,
        Err(e) => error!("Failed to fetch playlist {}: {}", id, e),
    };

    info!("{} ({} tracks)", playlist.name, playlist.tracks.items.len());

    let rows = utils::playlist_table_rows(&playlist);
    if rows.is_empty() {
        warning!("Playlist {} has no tracks", playlist.name);
        return;
    }

    println!("{}", Table::new(rows));
}
