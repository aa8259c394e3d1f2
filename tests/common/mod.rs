//! Shared fixtures for the integration tests.
//!
//! The Spotify API is simulated with wiremock; fixtures build JSON in the
//! shapes the Web API returns.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use trackmark::{config::ClientConfig, spotify::SpotifyClient, types::Playlist};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Long enough that no periodic report fires during a test.
pub const QUIET_INTERVAL: Duration = Duration::from_secs(3600);

pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-client", "test-secret")
        .with_api_url(format!("{}/v1", server.uri()))
        .with_token_url(format!("{}/api/token", server.uri()))
        .with_stats_report_interval(QUIET_INTERVAL)
}

pub fn client(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(test_config(server)).expect("client should build")
}

pub fn token_body(token: &str) -> Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": 3600
    })
}

pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("test-token")))
        .mount(server)
        .await;
}

pub fn track_json(id: &str, name: &str, artist_ids: &[&str]) -> Value {
    let artists: Vec<Value> = artist_ids
        .iter()
        .map(|a| json!({"id": a, "name": format!("Artist {}", a)}))
        .collect();

    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{}", id),
        "artists": artists
    })
}

pub fn entry(track: Value) -> Value {
    json!({"added_at": "2024-03-01T12:00:00Z", "track": track})
}

pub fn playlist_json(id: &str, name: &str, items: Vec<Value>, next: Option<String>) -> Value {
    let total = items.len();
    json!({
        "id": id,
        "name": name,
        "owner": {"id": "owner", "display_name": "Owner"},
        "tracks": {"items": items, "next": next, "total": total}
    })
}

pub fn page_json(items: Vec<Value>, next: Option<String>) -> Value {
    json!({"items": items, "next": next})
}

/// A fully assembled playlist, as `get_playlist` would return it.
pub fn playlist(id: &str, tracks: Vec<Value>) -> Playlist {
    let items = tracks.into_iter().map(entry).collect();
    serde_json::from_value(playlist_json(id, &format!("Playlist {}", id), items, None))
        .expect("fixture playlist should deserialize")
}
