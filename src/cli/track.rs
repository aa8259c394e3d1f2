use crate::{error, info, spotify::SpotifyClient};

pub async fn show_track(client: &SpotifyClient, id: &str) {
    let track = match client.get_track(id).await {
        Ok(track) => track,
        Err(e) => error!("Failed to fetch track {}: {}", id, e),
    };

    info!("{} - {}", track.name, track.artist_names());
    if let Some(uri) = &track.uri {
        info!("{}", uri);
    }
}
