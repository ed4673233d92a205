// src/engine/lifecycle.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::engine::dispatch::{ChangeDispatcher, ChangeEvent};
use crate::engine::runtime::{ChannelId, Detector, DetectorWindows, EngineEvent};
use crate::engine::scheduler::{spawn_poll_loop, ObservationChannel};
use crate::engine::state::SharedState;
use crate::engine::tracker::{spawn_tracker, ForegroundProbe};
use crate::resource::reader::{ChangeNotifier, ResourceReader, ResourceSnapshot};

/// Capacity of the unified tick channel into the detector.
const ENGINE_EVENT_CAPACITY: usize = 64;

/// Handles owned while the engine is active.
struct ActiveChannels {
    events_tx: mpsc::Sender<EngineEvent>,
    detector: JoinHandle<()>,
    pollers: Vec<JoinHandle<()>>,
    tracker: JoinHandle<()>,
}

/// Lifecycle controller for the change-detection engine.
///
/// `start()` and `stop()` are idempotent and may be called from any external
/// trigger. Consumer registration ([`subscribe`](Engine::subscribe)) is
/// independent of lifecycle. Both lifecycle methods must be called from
/// within a tokio runtime, as they spawn and abort the engine's tasks.
///
/// The engine's content state survives `stop()`/`start()` cycles: the
/// restart re-seeds the baseline from the current resource value, so a
/// change made while stopped is never announced as new.
pub struct Engine {
    config: EngineConfig,
    reader: Arc<dyn ResourceReader>,
    notifier: Option<Box<dyn ChangeNotifier>>,
    probe: Arc<dyn ForegroundProbe>,
    state: SharedState,
    dispatcher: ChangeDispatcher,
    active: Option<ActiveChannels>,
}

impl Engine {
    /// Build a stopped engine.
    ///
    /// `notifier` is the optional native change subscription; the engine
    /// detects changes through polling alone when it is absent (or when its
    /// registration fails).
    pub fn new(
        config: EngineConfig,
        reader: Arc<dyn ResourceReader>,
        notifier: Option<Box<dyn ChangeNotifier>>,
        probe: Arc<dyn ForegroundProbe>,
    ) -> Self {
        let state = SharedState::new();
        let dispatcher = ChangeDispatcher::new(state.clone(), config.republish_delay());
        Self {
            config,
            reader,
            notifier,
            probe,
            state,
            dispatcher,
            active: None,
        }
    }

    /// Register a consumer of accepted changes. Independent of lifecycle:
    /// valid before `start()` and across restarts. Unregister by dropping
    /// the receiver.
    pub fn subscribe(&self) -> mpsc::Receiver<ChangeEvent> {
        self.dispatcher.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Latest execution-state flag, for diagnostics.
    pub fn is_background(&self) -> bool {
        self.state.is_background()
    }

    /// Start the engine. No-op when already running.
    ///
    /// Performs one synchronous read to seed the change baseline (never
    /// dispatched, even if the resource is non-empty), registers the native
    /// subscription, then spawns the detector, both poll loops and the
    /// execution-state tracker.
    pub fn start(&mut self) {
        if self.state.is_running() {
            debug!("start() while already running; ignoring");
            return;
        }

        self.seed_baseline();

        let (events_tx, events_rx) = mpsc::channel::<EngineEvent>(ENGINE_EVENT_CAPACITY);

        // Registration failure is tolerated: the poll loops still cover
        // detection, just without the low-latency native signal.
        if let Some(notifier) = self.notifier.as_mut() {
            if let Err(err) = notifier.subscribe(events_tx.clone()) {
                warn!(error = %err, "native change subscription failed; polling only");
            }
        }

        self.state.lock().is_running = true;

        let windows = DetectorWindows {
            foreground: self.config.debounce_window(),
            background: self.config.background_debounce_window(),
        };
        let detector = Detector::new(
            Arc::clone(&self.reader),
            self.state.clone(),
            self.dispatcher.clone(),
            windows,
            events_rx,
        );
        let detector = tokio::spawn(detector.run());

        let pollers = vec![
            spawn_poll_loop(
                ObservationChannel {
                    id: ChannelId::PrimaryPoll,
                    cadence: self.config.primary_cadence(),
                    background_cadence: None,
                },
                self.state.clone(),
                events_tx.clone(),
            ),
            spawn_poll_loop(
                ObservationChannel {
                    id: ChannelId::SecondaryPoll,
                    cadence: self.config.secondary_cadence(),
                    background_cadence: Some(self.config.background_secondary_cadence()),
                },
                self.state.clone(),
                events_tx.clone(),
            ),
        ];

        let tracker = spawn_tracker(
            Arc::clone(&self.probe),
            self.state.clone(),
            self.config.tracker_cadence(),
        );

        self.active = Some(ActiveChannels {
            events_tx,
            detector,
            pollers,
            tracker,
        });

        info!("change-detection engine started");
    }

    /// Stop the engine. No-op when not running.
    ///
    /// Unregisters the native subscription and cancels all loops. A tick
    /// already past its read completes, but its dispatch is suppressed by
    /// the `is_running` re-check in the detector. Content state is kept.
    pub fn stop(&mut self) {
        if !self.state.is_running() {
            debug!("stop() while not running; ignoring");
            return;
        }

        self.state.lock().is_running = false;

        if let Some(notifier) = self.notifier.as_mut() {
            notifier.unsubscribe();
        }

        if let Some(active) = self.active.take() {
            for poller in &active.pollers {
                poller.abort();
            }
            active.tracker.abort();

            // Let the detector drain and exit on its own; aborting it could
            // cut a reader call short.
            let _ = active.events_tx.try_send(EngineEvent::Shutdown);
            drop(active.events_tx);
            drop(active.detector);
        }

        info!("change-detection engine stopped");
    }

    /// Initialize `last_accepted_content` from the current resource value
    /// without emitting a change event.
    fn seed_baseline(&self) {
        let snapshot = ResourceSnapshot::capture(self.reader.as_ref());
        if snapshot.readable {
            let mut state = self.state.lock();
            state.last_accepted_content = snapshot.content;
            debug!("change baseline seeded from current resource content");
        } else {
            debug!("resource unreadable at start; baseline unchanged");
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // Poll/tracker tasks would otherwise outlive the engine.
        if self.state.is_running() {
            self.stop();
        }
    }
}
