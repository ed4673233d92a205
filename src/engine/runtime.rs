// src/engine/runtime.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::engine::debounce;
use crate::engine::dispatch::{ChangeDispatcher, ChangeEvent};
use crate::engine::state::SharedState;
use crate::resource::reader::{ResourceReader, ResourceSnapshot};

/// Identity of the observation channel that produced a tick or an event.
///
/// Diagnostic only; the detection routine treats all channels identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelId {
    /// The platform's native change notification.
    Native,
    /// The primary polling loop.
    PrimaryPoll,
    /// The secondary polling loop.
    SecondaryPoll,
    /// The delayed hedged re-publish (dispatch-side, never a real tick).
    Republish,
}

/// Events sent into the detector from the observation channels.
///
/// Every producer (native subscription, both poll loops) holds a clone of
/// the `mpsc::Sender`; the detector is the single consumer and the sole
/// place the detection routine runs, so ticks are serialized regardless of
/// how many channels fire at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Tick { channel: ChannelId },
    Shutdown,
}

/// Debounce windows the detector picks between based on execution state.
#[derive(Debug, Clone, Copy)]
pub struct DetectorWindows {
    pub foreground: Duration,
    pub background: Duration,
}

/// The single consuming task of the engine.
///
/// Responsibilities:
/// - Drain the unified tick stream from all observation channels.
/// - Run the detection routine: read, compare, debounce, accept.
/// - Update shared state and hand accepted changes to the dispatcher.
pub struct Detector {
    reader: Arc<dyn ResourceReader>,
    state: SharedState,
    dispatcher: ChangeDispatcher,
    windows: DetectorWindows,
    events_rx: mpsc::Receiver<EngineEvent>,
}

impl Detector {
    pub fn new(
        reader: Arc<dyn ResourceReader>,
        state: SharedState,
        dispatcher: ChangeDispatcher,
        windows: DetectorWindows,
        events_rx: mpsc::Receiver<EngineEvent>,
    ) -> Self {
        Self {
            reader,
            state,
            dispatcher,
            windows,
            events_rx,
        }
    }

    /// Main detection loop. Exits on `Shutdown` or when every producer has
    /// dropped its sender.
    pub async fn run(mut self) {
        debug!("detector started");

        while let Some(event) = self.events_rx.recv().await {
            match event {
                EngineEvent::Tick { channel } => self.on_tick(channel),
                EngineEvent::Shutdown => {
                    debug!("detector shutdown requested");
                    break;
                }
            }
        }

        debug!("detector exiting");
    }

    /// One pass of the detection routine.
    ///
    /// The read happens outside the lock (it may block briefly and must not
    /// serialize against state readers); `is_running` is re-checked after
    /// the read so a tick in flight across `stop()` never dispatches.
    fn on_tick(&self, channel: ChannelId) {
        let snapshot = ResourceSnapshot::capture(self.reader.as_ref());

        if !snapshot.readable || snapshot.content.is_empty() {
            trace!(?channel, "tick: resource unreadable or empty");
            return;
        }

        let now = Instant::now();
        let background = {
            let mut state = self.state.lock();

            if !state.is_running {
                trace!(?channel, "tick after stop; ignoring");
                return;
            }

            if snapshot.content == state.last_accepted_content {
                trace!(?channel, "tick: content unchanged");
                return;
            }

            let window = if state.is_background {
                self.windows.background
            } else {
                self.windows.foreground
            };

            if !debounce::accept(now, state.last_accepted_at, window) {
                debug!(?channel, ?window, "change rejected by debounce window");
                return;
            }

            // Read-then-write as one atomic step: no other tick can
            // interleave between the comparison above and this update.
            state.last_accepted_content = snapshot.content.clone();
            state.last_accepted_at = Some(now);

            state.is_background
        };

        info!(?channel, background, "change accepted");

        self.dispatcher.publish(ChangeEvent {
            content: snapshot.content,
            detected_at: now,
            source: channel,
        });
    }
}
