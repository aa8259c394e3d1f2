use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
    time::Duration,
};

use serde::Serialize;

use crate::{
    error::Result,
    stats::{self, ReportHandle, StatsReporter},
    utils,
};

/// Retention policy of a [`Cache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Entries live as long as the cache; nothing is ever evicted.
    #[default]
    UnboundedNoEviction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetStats {
    pub attempted: u64,
    pub successful: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddStats {
    pub new: u64,
    pub overwrites: u64,
    pub tags: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub get: GetStats,
    pub add: AddStats,
}

struct CacheState<V> {
    entries: HashMap<String, V>,
    stats: CacheStats,
}

struct CacheShared<V> {
    name: String,
    state: Mutex<CacheState<V>>,
}

impl<V: Send + 'static> StatsReporter for CacheShared<V> {
    type Stats = CacheStats;

    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> CacheStats {
        utils::lock(&self.state).stats.clone()
    }
}

/// In-memory key/value store with hit and insert accounting.
///
/// Counters are reported periodically under the cache's name. Entries and
/// counters share one lock, so a presence check and the update that depends
/// on it can never interleave with another caller.
pub struct Cache<V> {
    shared: Arc<CacheShared<V>>,
    policy: CachePolicy,
    reporter: ReportHandle,
}

impl<V: Clone + Send + 'static> Cache<V> {
    /// Creates an empty cache and starts its stats reporter.
    ///
    /// Without a `name` the cache reports as `Cache`.
    pub fn new(name: Option<&str>, stats_report_interval: Duration) -> Result<Self> {
        Self::with_policy(name, CachePolicy::default(), stats_report_interval)
    }

    pub fn with_policy(
        name: Option<&str>,
        policy: CachePolicy,
        stats_report_interval: Duration,
    ) -> Result<Self> {
        let shared = Arc::new(CacheShared {
            name: stats::reporter_name::<Self>(name),
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
        });
        let reporter = ReportHandle::start(Arc::clone(&shared), stats_report_interval)?;

        Ok(Self {
            shared,
            policy,
            reporter,
        })
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn has(&self, key: &str) -> bool {
        utils::lock(&self.shared.state).entries.contains_key(key)
    }

    /// Returns a copy of the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = utils::lock(&self.shared.state);
        state.stats.get.attempted += 1;

        let value = state.entries.get(key).cloned();
        if value.is_some() {
            state.stats.get.successful += 1;
        }
        value
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn add(&self, key: impl Into<String>, value: V, tag: Option<&str>) {
        let key = key.into();
        let mut state = utils::lock(&self.shared.state);

        if state.entries.contains_key(&key) {
            state.stats.add.overwrites += 1;
        } else {
            state.stats.add.new += 1;
        }
        if let Some(tag) = tag {
            *state.stats.add.tags.entry(tag.to_string()).or_insert(0) += 1;
        }

        state.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        utils::lock(&self.shared.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.stats()
    }

    pub fn report_stats(&self) {
        self.shared.report_stats();
    }

    pub fn stop_reporting(&self) {
        self.reporter.stop();
    }
}
