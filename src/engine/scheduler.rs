// src/engine/scheduler.rs

//! The redundant observation channels feeding the detector.
//!
//! Two independently-cadenced poll loops run alongside the native change
//! subscription. If the platform starves one loop's timers, the other still
//! makes forward progress; the debounce gate downstream collapses the
//! resulting duplicate observations of a single true change.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::engine::runtime::{ChannelId, EngineEvent};
use crate::engine::state::SharedState;

/// Configuration of one timer-driven observation channel.
#[derive(Debug, Clone, Copy)]
pub struct ObservationChannel {
    pub id: ChannelId,
    /// Cadence while in the foreground.
    pub cadence: Duration,
    /// Cadence while in the background; `None` keeps `cadence`.
    pub background_cadence: Option<Duration>,
}

/// Spawn one polling loop for `channel`.
///
/// The effective cadence is re-evaluated every iteration, so a background
/// transition shortens the interval on the very next tick without any
/// restart. The loop ends when the detector side of `events_tx` is gone, or
/// when the returned handle is aborted by the lifecycle controller.
pub fn spawn_poll_loop(
    channel: ObservationChannel,
    state: SharedState,
    events_tx: mpsc::Sender<EngineEvent>,
) -> JoinHandle<()> {
    info!(id = ?channel.id, cadence = ?channel.cadence, "poll loop started");

    tokio::spawn(async move {
        loop {
            let cadence = match channel.background_cadence {
                Some(bg) if state.is_background() => bg,
                _ => channel.cadence,
            };
            sleep(cadence).await;

            if events_tx
                .send(EngineEvent::Tick {
                    channel: channel.id,
                })
                .await
                .is_err()
            {
                debug!(id = ?channel.id, "detector gone; poll loop ending");
                return;
            }
        }
    })
}
