// src/watch/mod.rs

//! Change detection for the source tree.
//!
//! Two independent producers:
//! - [`watcher`]: `notify`-based create/modify notifications for the source
//!   root, pushed into a channel.
//! - [`tracker`]: the periodic staleness poll over file modification times.
//!
//! Both filter on the same [`FileNamePattern`]. Neither knows how a publish
//! works; the watch loop in `engine` decides what to do with a change.

pub mod patterns;
pub mod tracker;
pub mod watcher;

pub use patterns::FileNamePattern;
pub use tracker::{modified_millis, FileTimestampTable};
pub use watcher::{spawn_watcher, ChangeEvent, ChangeKind, WatcherHandle};
