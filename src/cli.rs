// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};

use crate::config::Invocation;

/// Command-line arguments for `mirrorwatch`.
///
/// The three positionals are optional at the parser level so that a bare
/// invocation prints the usage text and exits cleanly instead of erroring.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mirrorwatch",
    version,
    about = "Mirror a source tree into a destination and resolve include directives on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Source directory to watch and mirror.
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory. Wiped and rebuilt on every publish.
    #[arg(value_name = "DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Regular expression matched against whole file names (e.g. `.*\.md`).
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Optional config file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Publish once and exit, no watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MIRRORWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// The positional parameters, if all three were given.
    pub fn invocation(&self) -> Option<Invocation> {
        Some(Invocation {
            source: self.source.clone()?,
            destination: self.destination.clone()?,
            pattern: self.pattern.clone()?,
        })
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// Full help text, printed when positionals are missing.
pub fn usage() -> String {
    CliArgs::command().render_help().to_string()
}
