// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod publish;
pub mod types;
pub mod watch;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_optional, Settings};
use crate::engine::WatchLoop;
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - argument + config resolution
/// - the optional `notify` watcher
/// - the watch loop (or a single publish with `--once`)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let Some(invocation) = args.invocation() else {
        println!("{}", cli::usage());
        return Ok(());
    };

    let cfg = load_optional(args.config.as_deref())?;
    let settings = Settings::resolve(invocation, &cfg)?;
    print_banner(&settings);

    let job = settings.publish_job();

    if args.once {
        let report = tokio::task::spawn_blocking(move || publish::publish(&job)).await??;
        debug!(?report, "single publish finished");
        return Ok(());
    }

    // Notifier → loop channel. Without a notifier the sender is dropped and
    // the loop relies on polling alone.
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let _watcher_handle = if settings.use_notifier {
        Some(spawn_watcher(&settings.source, event_tx)?)
    } else {
        info!("notifier disabled; polling only");
        drop(event_tx);
        None
    };

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Ctrl-C received; shutting down");
        let _ = shutdown_tx.send(true);
    });

    let watch_loop = WatchLoop::new(job, settings.poll_interval, event_rx)?;
    watch_loop.run(shutdown_rx).await;
    Ok(())
}

/// Echo the resolved parameters.
fn print_banner(settings: &Settings) {
    println!("{}", settings.source.display());
    println!("{}", settings.destination.display());
    println!("{}", settings.pattern);
}
