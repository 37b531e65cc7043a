// src/engine/mod.rs

//! Orchestration for mirrorwatch.
//!
//! The [`WatchLoop`] owns the timestamp table and reacts to two sources of
//! change:
//! - notifier events drained from a channel at the top of each iteration,
//! - the staleness poll run after the events.
//!
//! Either one triggers a publish (see [`crate::publish`]). Publishes run one
//! at a time; the loop does not move on until the current one has finished.

pub mod watch_loop;

pub use crate::types::PublishReason;
pub use watch_loop::{LoopStats, WatchLoop, DEFAULT_POLL_INTERVAL};
