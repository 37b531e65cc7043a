// src/config/settings.rs

//! Runtime settings: the three positional parameters combined with the
//! (optional) config file, checked once at startup.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::config::model::ConfigFile;
use crate::errors::{at_path, MirrorwatchError, Result};
use crate::publish::PublishJob;
use crate::types::LineEnding;
use crate::watch::patterns::FileNamePattern;

/// The positional parameters as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub pattern: String,
}

/// Everything the watch loop needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical source directory.
    pub source: PathBuf,
    /// Absolute, lexically normalized destination directory.
    pub destination: PathBuf,
    pub pattern: FileNamePattern,
    pub poll_interval: Duration,
    pub use_notifier: bool,
    pub line_ending: LineEnding,
}

impl Settings {
    /// Resolve and validate.
    ///
    /// Fails when the source is not an existing directory, the pattern does
    /// not compile, or source and destination overlap (the destination is
    /// wiped on every publish).
    pub fn resolve(invocation: Invocation, config: &ConfigFile) -> Result<Self> {
        let source = invocation
            .source
            .canonicalize()
            .map_err(|_| MirrorwatchError::SourceNotFound(invocation.source.clone()))?;
        if !source.is_dir() {
            return Err(MirrorwatchError::SourceNotFound(invocation.source));
        }

        let destination = absolute_destination(&invocation.destination)?;
        check_no_overlap(&source, &destination)?;

        let pattern = FileNamePattern::new(&invocation.pattern)?;

        Ok(Self {
            source,
            destination,
            pattern,
            poll_interval: config.poll_interval(),
            use_notifier: config.watch.use_notifier,
            line_ending: config.publish.line_ending,
        })
    }

    pub fn publish_job(&self) -> PublishJob {
        PublishJob {
            source: self.source.clone(),
            destination: self.destination.clone(),
            pattern: self.pattern.clone(),
            line_ending: self.line_ending,
        }
    }
}

fn absolute_destination(dest: &Path) -> Result<PathBuf> {
    if let Ok(canon) = dest.canonicalize() {
        return Ok(canon);
    }
    let abs = std::path::absolute(dest).map_err(at_path(dest))?;
    Ok(normalize_lexically(&abs))
}

fn check_no_overlap(source: &Path, destination: &Path) -> Result<()> {
    if destination.starts_with(source) || source.starts_with(destination) {
        return Err(MirrorwatchError::ConfigError(format!(
            "destination {:?} must not be, contain, or lie inside source {:?}",
            destination, source
        )));
    }
    Ok(())
}

/// Drop `.` components and fold `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
