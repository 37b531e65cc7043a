use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use mirrorwatch::publish::{PublishJob, TextEncoding};
use mirrorwatch::types::LineEnding;
use mirrorwatch::watch::FileNamePattern;
use tempfile::TempDir;

/// A temporary workspace with `src/` and `dist/` siblings.
///
/// The directory is removed when the fixture is dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("src")).expect("create src dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn src(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn dist(&self) -> PathBuf {
        self.dir.path().join("dist")
    }

    /// Tree builder rooted at `src/`.
    pub fn source_tree(&self) -> TreeBuilder {
        TreeBuilder::new(self.src())
    }

    /// Publish job for `src/` → `dist/` with LF line endings.
    pub fn job(&self, pattern: &str) -> PublishJob {
        PublishJob {
            source: self.src(),
            destination: self.dist(),
            pattern: FileNamePattern::new(pattern).expect("valid pattern"),
            line_ending: LineEnding::Lf,
        }
    }

    pub fn read_dist(&self, rel: &str) -> Vec<u8> {
        fs::read(self.dist().join(rel)).expect("read published file")
    }

    pub fn read_dist_string(&self, rel: &str) -> String {
        String::from_utf8(self.read_dist(rel)).expect("published file is UTF-8")
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for fixture directory trees.
pub struct TreeBuilder {
    root: PathBuf,
}

impl TreeBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        fs::create_dir_all(&root).expect("create tree root");
        Self { root }
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.root.join(rel)).expect("create fixture dir");
        self
    }

    pub fn file(self, rel: &str, contents: impl AsRef<[u8]>) -> Self {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Write `text` with the given encoding (including its BOM, if any).
    pub fn encoded_file(self, rel: &str, encoding: TextEncoding, text: &str) -> Self {
        let bytes = encoding.encode(text);
        self.file(rel, bytes)
    }
}

/// Push the modification time of `path` `secs` seconds into the future so the
/// staleness poll sees a change regardless of timestamp granularity.
pub fn bump_mtime(path: &Path, secs: u64) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open file to bump mtime");
    file.set_modified(SystemTime::now() + Duration::from_secs(secs))
        .expect("set mtime");
}
