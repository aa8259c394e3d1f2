//! Periodic stats reporting.
//!
//! A [`StatsReporter`] owns some serializable counters and knows how to emit
//! them. A [`ReportHandle`] drives the reporter on a fixed interval from a
//! background tokio task until it is stopped or dropped.
//!
//! Implementors provide `name` and `stats` and get `report_stats` for free.
//!
//! ```rust,ignore
//! let counters = Arc::new(MyCounters::default());
//! let handle = ReportHandle::start(Arc::clone(&counters), Duration::from_secs(10))?;
//! // ... every 10s: "MyCounters stats: {...}"
//! handle.stop();
//! ```

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use serde::Serialize;
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Default reporting interval for caches and the client.
pub const DEFAULT_STATS_REPORT_INTERVAL: Duration = Duration::from_secs(10);

pub trait StatsReporter: Send + Sync + 'static {
    type Stats: Serialize;

    /// Name used as the prefix of every report line.
    fn name(&self) -> &str;

    /// Snapshot of the current counters.
    fn stats(&self) -> Self::Stats;

    /// Emits one report. Override to route stats somewhere else.
    fn report_stats(&self) {
        match serde_json::to_string(&self.stats()) {
            Ok(json) => info!(
                target: "trackmark::stats",
                reporter = self.name(),
                "{} stats: {}",
                self.name(),
                json
            ),
            Err(e) => warn!(reporter = self.name(), "failed to serialize stats: {}", e),
        }
    }
}

/// Resolves the reporter name: the given one, or the short type name of `T`.
pub fn reporter_name<T: ?Sized>(name: Option<&str>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => crate::utils::short_type_name::<T>(),
    }
}

/// Background timer that calls [`StatsReporter::report_stats`] every interval.
///
/// The task only holds a weak reference, so it winds down on its own once the
/// reporter is dropped. Dropping the handle cancels the timer as well.
#[derive(Debug)]
pub struct ReportHandle {
    task: JoinHandle<()>,
    interval: Duration,
}

impl ReportHandle {
    /// Starts reporting on the current tokio runtime.
    ///
    /// The first report is emitted one full `interval` after this call.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if `interval` is zero
    /// - [`Error::NoRuntime`] if called outside a tokio runtime
    pub fn start<R: StatsReporter>(reporter: Arc<R>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidInput(format!(
                "stats report interval for {} must be positive",
                reporter.name()
            )));
        }

        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let weak: Weak<R> = Arc::downgrade(&reporter);
        debug!(reporter = reporter.name(), ?interval, "starting stats reporter");

        let task = runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            loop {
                ticker.tick().await;
                match weak.upgrade() {
                    Some(reporter) => reporter.report_stats(),
                    None => break,
                }
            }
        });

        Ok(Self { task, interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancels the timer. No reports are emitted afterwards.
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ReportHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
