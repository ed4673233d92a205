// src/engine/state.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Mutable engine state shared between the observation channels, the
/// detector, the tracker and the lifecycle controller.
///
/// Invariants:
/// - `last_accepted_content` / `last_accepted_at` are written only by the
///   detection routine (after a debounce acceptance) and by the lifecycle
///   seed read; the write is read-then-write under one lock.
/// - `is_background` is written only by the execution-state tracker.
/// - `is_running` is written only by the lifecycle controller.
/// - Content fields deliberately survive `stop()`/`start()` cycles, so a
///   change that happened while stopped is not re-announced on restart.
#[derive(Debug)]
pub struct EngineState {
    /// Content of the most recently accepted change; empty at creation.
    pub last_accepted_content: String,
    /// Monotonic time of the last acceptance; `None` until the first one.
    pub last_accepted_at: Option<Instant>,
    /// Guards idempotent start/stop.
    pub is_running: bool,
    /// Latest value from the execution-state tracker.
    pub is_background: bool,
}

impl EngineState {
    fn new() -> Self {
        Self {
            last_accepted_content: String::new(),
            last_accepted_at: None,
            is_running: false,
            is_background: false,
        }
    }
}

/// Shared handle to [`EngineState`].
///
/// The observation channels are real tokio tasks, so the read-then-write in
/// the detection routine needs mutual exclusion. All critical sections are
/// short and never held across an await point.
#[derive(Debug, Clone)]
pub struct SharedState(Arc<Mutex<EngineState>>);

impl SharedState {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(EngineState::new())))
    }

    /// Lock the state. Poisoning is recovered by taking the inner value:
    /// every writer keeps the state internally consistent even on panic.
    pub fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running
    }

    pub fn is_background(&self) -> bool {
        self.lock().is_background
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
