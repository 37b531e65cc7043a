use serde::Deserialize;

/// Line terminator written after every plain line when the include resolver
/// rewrites a mirrored file.
///
/// - `Native`: the platform default (`\r\n` on Windows, `\n` elsewhere).
/// - `Lf` / `Crlf`: force a specific terminator regardless of platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Native,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Why a publish cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// Unconditional publish at startup (or `--once`).
    Startup,
    /// A notifier event for a matching file.
    FileEvent,
    /// The staleness poll saw a changed timestamp.
    Poll,
    /// The previous publish failed and is being retried.
    Retry,
}

impl std::fmt::Display for PublishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PublishReason::Startup => "startup",
            PublishReason::FileEvent => "file-event",
            PublishReason::Poll => "poll",
            PublishReason::Retry => "retry",
        };
        f.write_str(s)
    }
}
