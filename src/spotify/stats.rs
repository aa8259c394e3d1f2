use std::{collections::BTreeMap, fmt, sync::Mutex};

use reqwest::{Method, Url};
use serde::{Serialize, Serializer};

use crate::{stats::StatsReporter, utils};

/// Stats bucket: HTTP method plus the first two path segments.
///
/// `GET https://api.spotify.com/v1/playlists/abc/tracks?offset=100` lands in
/// `GET /v1/playlists`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey {
    method: String,
    path: String,
}

impl EndpointKey {
    pub fn new(method: &Method, url: &Url) -> Self {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).take(2).collect())
            .unwrap_or_default();

        Self::from_parts(method.as_str(), &format!("/{}", segments.join("/")))
    }

    pub fn from_parts(method: &str, path: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl Serialize for EndpointKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Counters for one endpoint. They only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestStats {
    pub attempted: u64,
    pub succeeded: u64,
    /// Non-success responses by status code.
    pub failed: BTreeMap<u16, u64>,
    /// Requests without a usable response, by error kind.
    pub errored: BTreeMap<String, u64>,
}

pub(crate) struct RequestStatsRegistry {
    name: String,
    endpoints: Mutex<BTreeMap<EndpointKey, RequestStats>>,
}

impl RequestStatsRegistry {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            endpoints: Mutex::new(BTreeMap::new()),
        }
    }

    fn update(&self, endpoint: &EndpointKey, apply: impl FnOnce(&mut RequestStats)) {
        let mut endpoints = utils::lock(&self.endpoints);
        apply(endpoints.entry(endpoint.clone()).or_default());
    }

    pub(crate) fn record_attempt(&self, endpoint: &EndpointKey) {
        self.update(endpoint, |s| s.attempted += 1);
    }

    pub(crate) fn record_success(&self, endpoint: &EndpointKey) {
        self.update(endpoint, |s| s.succeeded += 1);
    }

    pub(crate) fn record_failure(&self, endpoint: &EndpointKey, status: u16) {
        self.update(endpoint, |s| *s.failed.entry(status).or_insert(0) += 1);
    }

    pub(crate) fn record_error(&self, endpoint: &EndpointKey, kind: &str) {
        self.update(endpoint, |s| *s.errored.entry(kind.to_string()).or_insert(0) += 1);
    }
}

impl StatsReporter for RequestStatsRegistry {
    type Stats = BTreeMap<EndpointKey, RequestStats>;

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> Self::Stats {
        utils::lock(&self.endpoints).clone()
    }
}
