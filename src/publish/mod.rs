// src/publish/mod.rs

//! One publish cycle: clear the destination, mirror the source into it, then
//! resolve include directives in the mirrored copies.
//!
//! Everything here is synchronous, blocking filesystem work. The watch loop
//! runs it on tokio's blocking pool and waits for it before continuing.

pub mod encoding;
pub mod include;
pub mod mirror;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::info;

use crate::errors::Result;
use crate::types::LineEnding;
use crate::watch::patterns::FileNamePattern;

pub use encoding::{detect_encoding, TextEncoding, DEFAULT_ENCODING};
pub use include::{resolve_tree, IncludeUniverse, ResolveStats};
pub use mirror::{clear_directory, copy_directory, CopyStats};

/// Inputs for a publish cycle.
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Names of source files whose changes trigger a publish.
    pub pattern: FileNamePattern,
    pub line_ending: LineEnding,
}

/// Outcome of a successful publish cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub copied: CopyStats,
    pub resolved: ResolveStats,
    pub elapsed: Duration,
}

/// Run clear → copy → resolve. The first error aborts the cycle and leaves
/// the destination as it was at that point.
pub fn publish(job: &PublishJob) -> Result<PublishReport> {
    let started = Instant::now();

    clear_directory(&job.destination)?;
    let copied = copy_directory(&job.source, &job.destination)?;
    let resolved = resolve_tree(&job.destination, job.line_ending)?;

    let report = PublishReport {
        copied,
        resolved,
        elapsed: started.elapsed(),
    };
    info!(
        files = copied.files,
        resolved = resolved.files,
        spliced = resolved.spliced,
        dangling = resolved.dangling,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "publish complete"
    );
    Ok(report)
}
