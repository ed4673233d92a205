// tests/engine_background.rs

mod common;
use crate::common::{
    assert_silent, fast_engine_config, init_tracing, recv_within, FakeResource, ScriptedProbe,
};

use std::sync::Arc;
use std::time::Duration;

use clipwatch::engine::{ChannelId, Engine, ForegroundProbe, StaticProbe, ToggleProbe};
use clipwatch::resource::ResourceReader;

const DELIVERY: Duration = Duration::from_millis(300);

/// Time for the 20ms tracker to pick up a probe change, with margin.
const TRACKER_SETTLE: Duration = Duration::from_millis(100);

#[tokio::test]
async fn background_change_is_delivered_exactly_twice() {
    init_tracing();

    let resource = Arc::new(FakeResource::new("A"));
    let mut engine = Engine::new(
        fast_engine_config(),
        Arc::clone(&resource) as Arc<dyn ResourceReader>,
        None,
        Arc::new(StaticProbe::background()),
    );
    let mut changes = engine.subscribe();

    engine.start();
    tokio::time::sleep(TRACKER_SETTLE).await;
    assert!(engine.is_background());

    resource.set("B");

    let first = recv_within(&mut changes, DELIVERY)
        .await
        .expect("original delivery");
    assert_eq!(first.content, "B");
    assert_ne!(first.source, ChannelId::Republish);

    let hedge = recv_within(&mut changes, DELIVERY)
        .await
        .expect("hedged re-publish");
    assert_eq!(hedge.content, "B");
    assert_eq!(hedge.source, ChannelId::Republish);
    assert_eq!(hedge.detected_at, first.detected_at);

    // Exactly two: no third delivery.
    assert_silent(&mut changes, Duration::from_millis(200)).await;

    engine.stop();
}

#[tokio::test]
async fn foreground_change_is_delivered_exactly_once() {
    init_tracing();

    let resource = Arc::new(FakeResource::new("A"));
    let mut engine = Engine::new(
        fast_engine_config(),
        Arc::clone(&resource) as Arc<dyn ResourceReader>,
        None,
        Arc::new(StaticProbe::foreground()),
    );
    let mut changes = engine.subscribe();

    engine.start();
    resource.set("B");

    let event = recv_within(&mut changes, DELIVERY)
        .await
        .expect("change should be dispatched");
    assert_eq!(event.content, "B");
    assert_silent(&mut changes, Duration::from_millis(200)).await;

    engine.stop();
}

/// Flipping into the background shortens the debounce window on the next
/// tracker cycle, with no stop()/start() in between.
#[tokio::test]
async fn background_transition_shortens_window_without_restart() {
    init_tracing();

    let mut cfg = fast_engine_config();
    cfg.debounce_window_ms = 10_000; // effectively blocks any second change
    cfg.background_debounce_window_ms = 40;

    let resource = Arc::new(FakeResource::new("A"));
    let probe = Arc::new(ToggleProbe::new()); // starts foreground
    let mut engine = Engine::new(
        cfg,
        Arc::clone(&resource) as Arc<dyn ResourceReader>,
        None,
        Arc::clone(&probe) as Arc<dyn ForegroundProbe>,
    );
    let mut changes = engine.subscribe();

    engine.start();

    resource.set("B");
    let event = recv_within(&mut changes, DELIVERY)
        .await
        .expect("first change is accepted regardless of window");
    assert_eq!(event.content, "B");

    // Inside the huge foreground window: rejected.
    resource.set("C");
    assert_silent(&mut changes, Duration::from_millis(200)).await;

    // Enter background; the 40ms window has long elapsed, so the still
    // pending "C" is picked up by the next poll.
    probe.set_foreground(false);

    let event = recv_within(&mut changes, DELIVERY)
        .await
        .expect("background window should admit the pending change");
    assert_eq!(event.content, "C");

    engine.stop();
}

#[tokio::test]
async fn probe_failure_never_flips_execution_state() {
    init_tracing();

    let resource = Arc::new(FakeResource::new("A"));
    // Fails from the first probe on: the initial foreground assumption holds.
    let probe = Arc::new(ScriptedProbe::new([]));
    let mut engine = Engine::new(fast_engine_config(), resource, None, probe);

    engine.start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!engine.is_background());

    engine.stop();
}

#[tokio::test]
async fn probe_failure_retains_background_state() {
    init_tracing();

    let resource = Arc::new(FakeResource::new("A"));
    // One successful background probe, then failures forever.
    let probe = Arc::new(ScriptedProbe::new([Some(false)]));
    let mut engine = Engine::new(fast_engine_config(), resource, None, probe);

    engine.start();
    tokio::time::sleep(TRACKER_SETTLE).await;
    assert!(engine.is_background());

    // Later failures keep, not reset, the flag.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(engine.is_background());

    engine.stop();
}
