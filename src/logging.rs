// src/logging.rs

//! Logging setup for `mirrorwatch`.
//!
//! The filter comes from, in order:
//! 1. `--log-level`
//! 2. `MIRRORWATCH_LOG`, which takes full `EnvFilter` directives
//!    (`debug`, `mirrorwatch=trace,notify=warn`, ...)
//! 3. `info`
//!
//! Logs go to STDERR. The startup banner and usage text go to STDOUT, so
//! piping the banner never mixes in log lines.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "MIRRORWATCH_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(env_filter(cli_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Filter for `cli_level`, falling back to `MIRRORWATCH_LOG` and then `info`.
///
/// An unparsable `MIRRORWATCH_LOG` is reported on stderr and ignored; no
/// subscriber exists yet to log it.
pub fn env_filter(cli_level: Option<LogLevel>) -> EnvFilter {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("ignoring {LOG_ENV_VAR}={directives:?}: {err}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    })
}

fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> &str {
    if let Some(level) = cli_level {
        return level_directive(level);
    }
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_DIRECTIVES,
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
