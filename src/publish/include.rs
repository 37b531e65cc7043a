// src/publish/include.rs

//! Resolution of `<!-- include::<name> -->` directives in the mirrored tree.
//!
//! Every regular file in the tree is rewritten, whatever its name.
//!
//! Semantics:
//! - The include universe (every regular file under the destination) is
//!   snapshotted once, before any file is rewritten.
//! - A directive line is replaced by the lines of the first universe file
//!   whose base name equals `<name>`, concatenated with no separator and
//!   with no terminator after them.
//! - Dangling or malformed directives are kept literally, also without a
//!   terminator.
//! - Every other line is followed by the configured line ending.
//! - Included text is not scanned for further directives.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{at_path, Result};
use crate::publish::encoding::detect_encoding;
use crate::types::LineEnding;

pub const INCLUDE_MARKER: &str = "<!-- include::";
pub const INCLUDE_CLOSE: &str = " -->";

/// A line that contains [`INCLUDE_MARKER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// Well-formed directive naming a file.
    Include(&'a str),
    /// Marker present but no closing ` -->` after it.
    Malformed,
}

/// Parse a single line. Returns `None` for ordinary lines.
///
/// The file name is the text between the marker and the first ` -->` that
/// follows it.
pub fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let start = line.find(INCLUDE_MARKER)? + INCLUDE_MARKER.len();
    let rest = &line[start..];
    Some(match rest.find(INCLUDE_CLOSE) {
        Some(end) => Directive::Include(&rest[..end]),
        None => Directive::Malformed,
    })
}

/// Split `text` into lines, accepting `\n`, `\r\n` and a lone `\r` as
/// terminators. Terminators are not part of the returned lines and a
/// trailing terminator does not produce an empty final line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Snapshot of every regular file in the mirrored tree.
#[derive(Debug, Clone, Default)]
pub struct IncludeUniverse {
    files: Vec<PathBuf>,
}

impl IncludeUniverse {
    /// Walk `root` (sorted by file name) and record all regular files.
    pub fn snapshot(root: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(Self { files })
    }

    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// First file (in snapshot order) whose base name equals `name`.
    pub fn find(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(name))
            .map(PathBuf::as_path)
    }
}

/// What happened while resolving one file (or a whole tree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub files: usize,
    pub spliced: usize,
    pub dangling: usize,
    pub malformed: usize,
}

impl ResolveStats {
    fn absorb(&mut self, other: ResolveStats) {
        self.files += other.files;
        self.spliced += other.spliced;
        self.dangling += other.dangling;
        self.malformed += other.malformed;
    }
}

/// Resolve directives in already-decoded `text`.
///
/// `load` returns the decoded contents of a matched include file.
pub fn resolve_text<F>(
    text: &str,
    universe: &IncludeUniverse,
    line_ending: LineEnding,
    mut load: F,
) -> Result<(String, ResolveStats)>
where
    F: FnMut(&Path) -> Result<String>,
{
    let eol = line_ending.as_str();
    let mut out = String::with_capacity(text.len());
    let mut stats = ResolveStats::default();

    for line in split_lines(text) {
        match parse_directive(line) {
            None => {
                out.push_str(line);
                out.push_str(eol);
            }
            Some(Directive::Include(name)) => match universe.find(name) {
                Some(target) => {
                    let included = load(target)?;
                    for inc_line in split_lines(&included) {
                        out.push_str(inc_line);
                    }
                    stats.spliced += 1;
                }
                None => {
                    debug!(include = %name, "dangling include; keeping directive");
                    out.push_str(line);
                    stats.dangling += 1;
                }
            },
            Some(Directive::Malformed) => {
                warn!(line = %line, "malformed include directive; keeping it literally");
                out.push_str(line);
                stats.malformed += 1;
            }
        }
    }

    Ok((out, stats))
}

/// Read and decode a file using its detected encoding.
pub fn read_text(path: &Path) -> Result<String> {
    let encoding = detect_encoding(path);
    let bytes = fs::read(path).map_err(at_path(path))?;
    Ok(encoding.decode(&bytes))
}

/// Resolve directives in a single file and rewrite it in place, keeping its
/// detected encoding.
pub fn resolve_file(
    path: &Path,
    universe: &IncludeUniverse,
    line_ending: LineEnding,
) -> Result<ResolveStats> {
    let encoding = detect_encoding(path);
    let bytes = fs::read(path).map_err(at_path(path))?;
    let text = encoding.decode(&bytes);

    let (resolved, mut stats) = resolve_text(&text, universe, line_ending, read_text)?;

    fs::write(path, encoding.encode(&resolved)).map_err(at_path(path))?;
    stats.files = 1;

    debug!(?path, %encoding, spliced = stats.spliced, "resolved includes");
    Ok(stats)
}

/// Resolve every regular file under `root`, in snapshot order.
///
/// Files are read and rewritten in place one after another, so an include
/// that points at a file earlier in the snapshot sees its resolved content.
/// Any file-level error aborts the whole pass.
pub fn resolve_tree(root: &Path, line_ending: LineEnding) -> Result<ResolveStats> {
    let universe = IncludeUniverse::snapshot(root)?;
    let mut total = ResolveStats::default();

    for file in universe.files() {
        let stats = resolve_file(file, &universe, line_ending)?;
        total.absorb(stats);
    }

    Ok(total)
}
