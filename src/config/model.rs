// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::engine::DEFAULT_POLL_INTERVAL;
use crate::types::LineEnding;

/// Configuration as read from an optional TOML file, before validation.
///
/// ```toml
/// [watch]
/// poll_interval_ms = 1000
/// use_notifier = true
///
/// [publish]
/// line_ending = "native"
/// ```
///
/// All sections are optional and have the defaults shown above.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub publish: PublishSection,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub publish: PublishSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, publish: PublishSection) -> Self {
        Self { watch, publish }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watch.poll_interval_ms)
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Sleep between loop iterations, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Register a `notify` watcher on the source root. With `false`, only the
    /// staleness poll detects changes (useful on network filesystems).
    #[serde(default = "default_use_notifier")]
    pub use_notifier: bool,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_use_notifier() -> bool {
    true
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            use_notifier: default_use_notifier(),
        }
    }
}

/// `[publish]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishSection {
    /// Terminator written after each plain line of a resolved file.
    #[serde(default)]
    pub line_ending: LineEnding,
}
