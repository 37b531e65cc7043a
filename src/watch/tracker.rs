// src/watch/tracker.rs

//! Timestamp-based staleness tracking for the source tree.
//!
//! This is a coarse poll, not a change log: several edits to one file between
//! two polls show up as a single change.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{MirrorwatchError, Result};
use crate::watch::patterns::FileNamePattern;

/// Last observed modification time (ms since the Unix epoch) per source file.
///
/// Entries for files that disappear are kept; they are harmless because a
/// vanished file is never walked again.
#[derive(Debug, Clone, Default)]
pub struct FileTimestampTable {
    entries: HashMap<PathBuf, i64>,
}

impl FileTimestampTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current timestamp of every regular file under `root`.
    ///
    /// No pattern filtering is applied here. Per-file failures are logged and
    /// skipped; a missing `root` is an error.
    pub fn initialize(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(MirrorwatchError::SourceNotFound(root.to_path_buf()));
        }

        let mut table = Self::new();
        for path in regular_files(root) {
            match modified_millis(&path) {
                Ok(ts) => {
                    table.entries.insert(path, ts);
                }
                Err(err) => warn!(?path, error = %err, "could not read modification time"),
            }
        }

        debug!(?root, tracked = table.len(), "initialized timestamp table");
        Ok(table)
    }

    /// Rescan `root` and return every file matching `pattern` whose timestamp
    /// differs from the stored one (or that has no entry yet). The table is
    /// updated as a side effect.
    pub fn check_for_changes(&mut self, root: &Path, pattern: &FileNamePattern) -> Vec<PathBuf> {
        let mut changed = Vec::new();

        for path in regular_files(root) {
            if !pattern.matches_path(&path) {
                continue;
            }
            let current = match modified_millis(&path) {
                Ok(ts) => ts,
                Err(err) => {
                    warn!(?path, error = %err, "could not read modification time");
                    continue;
                }
            };
            if self.entries.get(&path) != Some(&current) {
                debug!(?path, modified = current, "timestamp changed");
                self.entries.insert(path.clone(), current);
                changed.push(path);
            }
        }

        changed
    }

    /// `true` if any file matching `pattern` changed since the last scan.
    pub fn check_for_updates(&mut self, root: &Path, pattern: &FileNamePattern) -> bool {
        !self.check_for_changes(root, pattern).is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<i64> {
        self.entries.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walk `root` and yield regular files. Walk errors are logged and skipped.
fn regular_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during scan");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
}

/// Modification time of `path` in milliseconds since the Unix epoch.
/// Times before the epoch come out negative.
pub fn modified_millis(path: &Path) -> std::io::Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(system_time_millis(modified))
}

fn system_time_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(before) => -(before.duration().as_millis() as i64),
    }
}
