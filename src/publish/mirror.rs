// src/publish/mirror.rs

//! Clearing and recursively copying the destination tree.

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{at_path, MirrorwatchError, Result};

/// Counters from one [`copy_directory`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub directories: usize,
    pub files: usize,
}

/// Remove everything under `dir` (files first, then directories bottom-up)
/// and recreate it as an empty directory, including missing parents.
pub fn clear_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        let mut removed = 0usize;
        for entry in WalkDir::new(dir).contents_first(true) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_dir() {
                fs::remove_dir(path).map_err(at_path(path))?;
            } else {
                fs::remove_file(path).map_err(at_path(path))?;
            }
            removed += 1;
        }
        debug!(?dir, removed, "cleared destination");
    }

    fs::create_dir_all(dir).map_err(at_path(dir))?;
    Ok(())
}

/// Copy `source` into `destination` recursively.
///
/// Directories are created before their contents (pre-order walk, sorted by
/// file name). Existing destination files are overwritten.
pub fn copy_directory(source: &Path, destination: &Path) -> Result<CopyStats> {
    let mut stats = CopyStats::default();

    let walker = WalkDir::new(source).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = entry?;
        let rel = entry.path().strip_prefix(source).map_err(|_| {
            MirrorwatchError::Other(anyhow!(
                "walked path {:?} is not under source {:?}",
                entry.path(),
                source
            ))
        })?;
        let target = destination.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(at_path(&target))?;
            stats.directories += 1;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).map_err(at_path(entry.path()))?;
            stats.files += 1;
        }
    }

    debug!(?source, ?destination, ?stats, "copied source tree");
    Ok(stats)
}
