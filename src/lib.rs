// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod resource;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{load_or_default, EngineConfig};
use crate::engine::{ChangeEvent, Engine, ForegroundProbe, ToggleProbe};
use crate::resource::{FileNotifier, FileResource};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the file-backed resource binding (reader + notify subscription)
/// - the change-detection engine
/// - a stdout consumer for accepted changes
/// - Ctrl-C handling (and SIGUSR1 foreground/background toggling on unix)
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref())?;

    if args.dry_run {
        print_dry_run(&cfg.engine);
        return Ok(());
    }

    let reader = Arc::new(FileResource::new(&args.resource));
    let notifier = Box::new(FileNotifier::new(&args.resource));
    let probe = Arc::new(ToggleProbe::new());

    let mut engine = Engine::new(
        cfg.engine,
        reader,
        Some(notifier),
        Arc::clone(&probe) as Arc<dyn ForegroundProbe>,
    );
    let mut changes = engine.subscribe();

    engine.start();
    info!(resource = %args.resource, "watching for changes, Ctrl-C to stop");

    spawn_execution_state_toggler(probe);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested, stopping engine");
                engine.stop();
                break;
            }
            change = changes.recv() => {
                match change {
                    Some(event) => print_change(&event),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

/// SIGUSR1 flips the foreground/background probe, so background cadences and
/// hedged delivery can be exercised without real platform throttling.
#[cfg(unix)]
fn spawn_execution_state_toggler(probe: Arc<ToggleProbe>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut usr1 = match signal(SignalKind::user_defined1()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("failed to listen for SIGUSR1: {e}");
                return;
            }
        };
        while usr1.recv().await.is_some() {
            let foreground = probe.toggle();
            info!(foreground, "execution-state toggle via SIGUSR1");
        }
    });
}

#[cfg(not(unix))]
fn spawn_execution_state_toggler(_probe: Arc<ToggleProbe>) {}

/// One line per accepted change on stdout, so the output can be piped.
fn print_change(event: &ChangeEvent) {
    println!("{}", event.content);
    info!(source = ?event.source, "change delivered");
}

/// Simple dry-run output: print the effective engine configuration.
fn print_dry_run(engine: &EngineConfig) {
    println!("clipwatch dry-run");
    println!("  engine.primary_cadence_ms = {}", engine.primary_cadence_ms);
    println!(
        "  engine.secondary_cadence_ms = {}",
        engine.secondary_cadence_ms
    );
    println!(
        "  engine.background_secondary_cadence_ms = {}",
        engine.background_secondary_cadence_ms
    );
    println!("  engine.debounce_window_ms = {}", engine.debounce_window_ms);
    println!(
        "  engine.background_debounce_window_ms = {}",
        engine.background_debounce_window_ms
    );
    println!("  engine.republish_delay_ms = {}", engine.republish_delay_ms);
    println!("  engine.tracker_cadence_ms = {}", engine.tracker_cadence_ms);
}
