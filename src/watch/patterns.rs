// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use regex::Regex;

use crate::errors::{MirrorwatchError, Result};

/// Compiled regular expression matched against a file's *name* (never its
/// full path).
///
/// The whole name must match: `.*\.md` accepts `readme.md` but not
/// `readme.md.bak`.
#[derive(Clone)]
pub struct FileNamePattern {
    source: String,
    regex: Regex,
}

impl fmt::Debug for FileNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileNamePattern").field(&self.source).finish()
    }
}

impl fmt::Display for FileNamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FileNamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| MirrorwatchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Match the final component of `path`. Paths without a UTF-8 file name
    /// never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.matches_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_full_name_match() {
        let p = FileNamePattern::new(r".*\.md").unwrap();
        assert!(p.matches_name("readme.md"));
        assert!(!p.matches_name("readme.md.bak"));
        assert!(!p.matches_name("notes.txt"));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let p = FileNamePattern::new(r"a\.txt|b\.txt").unwrap();
        assert!(p.matches_name("a.txt"));
        assert!(p.matches_name("b.txt"));
        assert!(!p.matches_name("xa.txt"));
        assert!(!p.matches_name("b.txtx"));
    }

    #[test]
    fn matches_only_the_file_name_component() {
        let p = FileNamePattern::new(r".*\.adoc").unwrap();
        assert!(p.matches_path(Path::new("/srv/docs.adoc/page.adoc")));
        assert!(!p.matches_path(Path::new("/srv/page.adoc/inner.txt")));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = FileNamePattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, MirrorwatchError::InvalidPattern { .. }));
    }
}
