// src/engine/watch_loop.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::publish::{publish, PublishJob, PublishReport};
use crate::types::PublishReason;
use crate::watch::tracker::FileTimestampTable;
use crate::watch::watcher::ChangeEvent;

/// Sleep between two iterations unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Counters kept across the lifetime of a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub publishes: u64,
    pub failures: u64,
}

/// Single-threaded driver: drain notifier events, poll timestamps, sleep.
pub struct WatchLoop {
    job: PublishJob,
    poll_interval: Duration,
    timestamps: FileTimestampTable,
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    /// Set when the last publish failed; the next iteration republishes.
    dirty: bool,
    stats: LoopStats,
}

impl fmt::Debug for WatchLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("source", &self.job.source)
            .field("destination", &self.job.destination)
            .field("tracked", &self.timestamps.len())
            .field("dirty", &self.dirty)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl WatchLoop {
    /// Build the loop and take the initial timestamp snapshot of the source.
    pub fn new(
        job: PublishJob,
        poll_interval: Duration,
        events: mpsc::UnboundedReceiver<ChangeEvent>,
    ) -> Result<Self> {
        let timestamps = FileTimestampTable::initialize(&job.source)?;
        Ok(Self {
            job,
            poll_interval,
            timestamps,
            events,
            dirty: false,
            stats: LoopStats::default(),
        })
    }

    pub fn timestamps(&self) -> &FileTimestampTable {
        &self.timestamps
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Publish once at startup, then iterate until `shutdown` turns `true`.
    ///
    /// If the shutdown sender is dropped without signalling, the loop keeps
    /// running until the process is killed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LoopStats {
        info!(interval_ms = self.poll_interval.as_millis() as u64, "watch loop started");

        self.publish_now(PublishReason::Startup).await;

        let mut shutdown_live = true;
        loop {
            let requested = *shutdown.borrow();
            if requested {
                break;
            }

            self.tick().await;

            let stop = tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => false,
                res = shutdown.changed(), if shutdown_live => match res {
                    Ok(()) => {
                        let requested = *shutdown.borrow();
                        requested
                    }
                    Err(_) => {
                        debug!("shutdown sender dropped; running until killed");
                        shutdown_live = false;
                        false
                    }
                },
            };
            if stop {
                break;
            }
        }

        info!(
            publishes = self.stats.publishes,
            failures = self.stats.failures,
            "watch loop stopped"
        );
        self.stats
    }

    /// One iteration without the sleep. Returns how many publishes ran.
    ///
    /// Every qualifying notifier event publishes on its own; the poll adds at
    /// most one more. A failed earlier publish is retried when nothing else
    /// triggered one.
    pub async fn tick(&mut self) -> usize {
        let mut published = 0;

        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            if !self.is_relevant(&event.path) {
                debug!(path = ?event.path, "ignoring event");
                continue;
            }
            info!(path = %event.path.display(), kind = ?event.kind, "detected change in file");
            self.publish_now(PublishReason::FileEvent).await;
            published += 1;
        }

        let changed = self.poll_timestamps().await;
        if !changed.is_empty() {
            debug!(count = changed.len(), ?changed, "staleness poll found changes");
            self.publish_now(PublishReason::Poll).await;
            published += 1;
        } else if self.dirty {
            self.publish_now(PublishReason::Retry).await;
            published += 1;
        }

        published
    }

    /// Rescan the source on the blocking pool and return the changed paths.
    ///
    /// The table is moved into the blocking task and back. If that task
    /// panics the table restarts empty, so the next poll sees every file as
    /// changed and publishes.
    async fn poll_timestamps(&mut self) -> Vec<PathBuf> {
        let mut table = std::mem::take(&mut self.timestamps);
        let source = self.job.source.clone();
        let pattern = self.job.pattern.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let changed = table.check_for_changes(&source, &pattern);
            (table, changed)
        })
        .await;

        match outcome {
            Ok((table, changed)) => {
                self.timestamps = table;
                changed
            }
            Err(join_err) => {
                error!(error = %join_err, "timestamp poll failed; table reset");
                Vec::new()
            }
        }
    }

    fn is_relevant(&self, path: &Path) -> bool {
        path.is_file() && self.job.pattern.matches_path(path)
    }

    /// Run a full publish on the blocking pool and wait for it.
    ///
    /// Failures are logged and mark the loop dirty; they never end the loop.
    pub async fn publish_now(&mut self, reason: PublishReason) -> Option<PublishReport> {
        let job = self.job.clone();
        let outcome = tokio::task::spawn_blocking(move || publish(&job)).await;

        match outcome {
            Ok(Ok(report)) => {
                self.dirty = false;
                self.stats.publishes += 1;
                debug!(%reason, ?report, "publish succeeded");
                Some(report)
            }
            Ok(Err(err)) => {
                self.record_failure(reason, &err);
                None
            }
            Err(join_err) => {
                self.record_failure(reason, &join_err);
                None
            }
        }
    }

    fn record_failure(&mut self, reason: PublishReason, err: &dyn std::error::Error) {
        self.dirty = true;
        self.stats.failures += 1;
        error!(%reason, error = %err, "publish failed; retrying next iteration");
    }
}
