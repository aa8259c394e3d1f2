use std::collections::BTreeMap;

use tabled::Table;

use crate::{
    info,
    spotify::SpotifyClient,
    types::{CacheStatsRow, EndpointStatsRow},
};

/// Prints request counters per endpoint and the track cache counters.
pub fn print_stats(client: &SpotifyClient) {
    let endpoint_rows: Vec<EndpointStatsRow> = client
        .request_stats()
        .into_iter()
        .map(|(endpoint, stats)| EndpointStatsRow {
            endpoint: endpoint.to_string(),
            attempted: stats.attempted,
            succeeded: stats.succeeded,
            failed: format_counts(&stats.failed),
            errored: format_counts(&stats.errored),
        })
        .collect();

    if endpoint_rows.is_empty() {
        info!("No requests were made");
    } else {
        println!("{}", Table::new(endpoint_rows));
    }

    let cache = client.track_cache();
    let stats = cache.stats();
    let cache_row = CacheStatsRow {
        cache: cache.name().to_string(),
        entries: cache.len(),
        gets: stats.get.attempted,
        hits: stats.get.successful,
        new: stats.add.new,
        overwrites: stats.add.overwrites,
        tags: format_counts(&stats.add.tags),
    };
    println!("{}", Table::new(vec![cache_row]));
}

fn format_counts<K: std::fmt::Display>(counts: &BTreeMap<K, u64>) -> String {
    counts
        .iter()
        .map(|(key, count)| format!("{}: {}", key, count))
        .collect::<Vec<_>>()
        .join(", ")
}
