use std::sync::{Mutex, MutexGuard, PoisonError};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::types::{Playlist, PlaylistTableRow};

/// Builds the `Authorization` header value for the client-credentials grant.
pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(credentials))
}

/// Locks a mutex, recovering the data if a previous holder panicked.
///
/// Counters and caches stay usable after a panic elsewhere; at worst a single
/// increment is lost.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Short name of a type without module path or generic parameters.
///
/// `trackmark::cache::Cache<trackmark::types::Track>` becomes `Cache`.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_string()
}

pub fn playlist_table_rows(playlist: &Playlist) -> Vec<PlaylistTableRow> {
    playlist
        .tracks
        .items
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| entry.track.as_ref().map(|t| (position, entry, t)))
        .map(|(position, entry, track)| PlaylistTableRow {
            position: position + 1,
            name: track.name.clone(),
            artists: track.artist_names(),
            added: entry
                .added_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            id: track.id.clone(),
        })
        .collect()
}
