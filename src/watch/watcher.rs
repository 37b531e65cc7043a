// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;

/// Kind of filesystem change forwarded to the watch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
}

/// A create/modify notification for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Map a `notify` event kind onto the kinds the watch loop cares about.
pub fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Created),
        EventKind::Modify(_) => Some(ChangeKind::Modified),
        _ => None,
    }
}

/// Watch `root` (non-recursively) and forward create/modify events into
/// `event_tx`.
///
/// The notify callback runs on notify's own thread; it never blocks, it only
/// pushes into the unbounded channel. The watch loop drains the channel with
/// `try_recv` once per iteration.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    event_tx: mpsc::UnboundedSender<ChangeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let Some(kind) = classify(&event.kind) else {
                    return;
                };
                for path in event.paths {
                    debug!(?path, ?kind, "notify event");
                    if event_tx.send(ChangeEvent { path, kind }).is_err() {
                        // Receiver gone: the watch loop has stopped.
                        return;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::NonRecursive)?;

    info!("file watcher started on {:?}", root);

    Ok(WatcherHandle { _inner: watcher })
}
