#![allow(dead_code)] // each test binary uses a different subset of helpers

use std::collections::VecDeque;
use std::sync::{Mutex, Once};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing_subscriber::{fmt, EnvFilter};

use clipwatch::config::EngineConfig;
use clipwatch::engine::{ChangeEvent, ForegroundProbe};
use clipwatch::errors::{ProbeError, ReadError};
use clipwatch::resource::ResourceReader;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Engine config with cadences shrunk so tests run in milliseconds.
///
/// Debounce window stays comfortably larger than the poll cadences so the
/// redundant channels never double-accept one change.
pub fn fast_engine_config() -> EngineConfig {
    EngineConfig {
        primary_cadence_ms: 10,
        secondary_cadence_ms: 15,
        background_secondary_cadence_ms: 5,
        debounce_window_ms: 400,
        background_debounce_window_ms: 40,
        republish_delay_ms: 30,
        tracker_cadence_ms: 20,
    }
}

/// In-memory resource: tests rewrite the "buffer" the way another process
/// would rewrite the real one.
#[derive(Debug, Default)]
pub struct FakeResource {
    content: Mutex<Option<String>>,
}

impl FakeResource {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(initial.into())),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            content: Mutex::new(None),
        }
    }

    pub fn set(&self, content: impl Into<String>) {
        *self.content.lock().unwrap() = Some(content.into());
    }

    pub fn make_unreadable(&self) {
        *self.content.lock().unwrap() = None;
    }
}

impl ResourceReader for FakeResource {
    fn read(&self) -> Result<String, ReadError> {
        self.content
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ReadError::Unavailable("fake resource unavailable".into()))
    }
}

/// Probe that replays a scripted sequence of results, then keeps failing.
/// `Some(foreground)` probes successfully; `None` is a probe failure.
#[derive(Debug)]
pub struct ScriptedProbe {
    script: Mutex<VecDeque<Option<bool>>>,
}

impl ScriptedProbe {
    pub fn new(script: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

impl ForegroundProbe for ScriptedProbe {
    fn probe(&self) -> Result<bool, ProbeError> {
        match self.script.lock().unwrap().pop_front() {
            Some(Some(foreground)) => Ok(foreground),
            _ => Err(ProbeError::Failed("script exhausted".into())),
        }
    }
}

/// Receive one change within `dur`, or `None` on timeout.
pub async fn recv_within(
    rx: &mut mpsc::Receiver<ChangeEvent>,
    dur: Duration,
) -> Option<ChangeEvent> {
    timeout(dur, rx.recv()).await.ok().flatten()
}

/// Assert no change is delivered for the whole of `dur`.
pub async fn assert_silent(rx: &mut mpsc::Receiver<ChangeEvent>, dur: Duration) {
    if let Some(event) = recv_within(rx, dur).await {
        panic!("expected no change event, got {event:?}");
    }
}
