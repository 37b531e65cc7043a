// src/config/mod.rs

//! Configuration loading and validation for mirrorwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Combine the command line with the config into `Settings` (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, PublishSection, RawConfigFile, WatchSection};
pub use settings::{Invocation, Settings};
