// src/errors.rs

//! Crate-wide error type and helpers.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Source directory not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error at {path:?}: {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("File watcher error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MirrorwatchError>;

/// Attach the offending path to an `io::Error`.
///
/// Usage: `fs::read(path).map_err(at_path(path))?`
pub fn at_path(path: &Path) -> impl FnOnce(std::io::Error) -> MirrorwatchError + '_ {
    move |source| MirrorwatchError::PathIo {
        path: path.to_path_buf(),
        source,
    }
}
