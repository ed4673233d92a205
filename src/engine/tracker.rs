// src/engine/tracker.rs

//! Foreground/background execution-state tracking.
//!
//! The host platform throttles timers of backgrounded processes; the rest of
//! the engine compensates by shortening the secondary poll cadence and the
//! debounce window while in the background. This module only maintains the
//! flag those components read; it never emits a change event itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::engine::state::SharedState;
use crate::errors::ProbeError;

/// Determines whether the host process currently holds foreground
/// scheduling priority.
pub trait ForegroundProbe: Send + Sync + 'static {
    /// `Ok(true)` = foreground. An `Err` means "unknown": the tracker keeps
    /// the previous value and never flips state on a failed probe.
    fn probe(&self) -> Result<bool, ProbeError>;
}

/// Probe with a fixed answer. Useful when the platform offers no meaningful
/// foreground notion (e.g. headless deployments) and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe {
    foreground: bool,
}

impl StaticProbe {
    pub fn foreground() -> Self {
        Self { foreground: true }
    }

    pub fn background() -> Self {
        Self { foreground: false }
    }
}

impl ForegroundProbe for StaticProbe {
    fn probe(&self) -> Result<bool, ProbeError> {
        Ok(self.foreground)
    }
}

/// Probe backed by a shared flag flipped from outside the engine.
///
/// The CLI flips it on SIGUSR1 so background behavior can be exercised
/// interactively; embedders can wire it to whatever foreground signal their
/// platform exposes.
#[derive(Debug, Clone)]
pub struct ToggleProbe {
    foreground_flag: Arc<AtomicBool>,
}

impl ToggleProbe {
    /// Starts in the foreground.
    pub fn new() -> Self {
        Self {
            foreground_flag: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_foreground(&self, foreground: bool) {
        self.foreground_flag.store(foreground, Ordering::Relaxed);
    }

    pub fn toggle(&self) -> bool {
        !self.foreground_flag.fetch_xor(true, Ordering::Relaxed)
    }
}

impl ForegroundProbe for ToggleProbe {
    fn probe(&self) -> Result<bool, ProbeError> {
        Ok(self.foreground_flag.load(Ordering::Relaxed))
    }
}

/// Spawn the execution-state tracking loop.
///
/// Probes on a fixed cadence; on a result that differs from the shared
/// flag, flips it and logs the transition. Probe failures are fail-safe:
/// logged, previous value retained.
pub fn spawn_tracker(
    probe: Arc<dyn ForegroundProbe>,
    state: SharedState,
    cadence: Duration,
) -> JoinHandle<()> {
    info!(?cadence, "execution-state tracker started");

    tokio::spawn(async move {
        loop {
            sleep(cadence).await;

            match probe.probe() {
                Ok(foreground) => {
                    let background = !foreground;
                    let mut guard = state.lock();
                    if guard.is_background != background {
                        guard.is_background = background;
                        drop(guard);
                        info!(
                            background,
                            "execution state transition: {}",
                            if background {
                                "entered background"
                            } else {
                                "returned to foreground"
                            }
                        );
                    }
                }
                Err(err) => {
                    debug!(error = %err, "probe failed; keeping previous execution state");
                }
            }
        }
    })
}
