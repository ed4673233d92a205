// src/engine/dispatch.rs

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::runtime::ChannelId;
use crate::engine::state::SharedState;

/// Capacity of each consumer channel. A consumer that falls this far behind
/// starts losing events; delivery is best-effort by contract.
const CONSUMER_CHANNEL_CAPACITY: usize = 64;

/// An accepted change, as delivered to consumers.
///
/// `source` names the observation channel that won the race for this change;
/// it is diagnostic only and must never drive business logic. Delivery is
/// at-least-once: while the process is in the background the same content is
/// re-published once (with `source == ChannelId::Republish`), so consumers
/// must dedupe, by `content` + `detected_at` or simply by `content`.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub content: String,
    pub detected_at: Instant,
    pub source: ChannelId,
}

/// Fan-out of accepted changes to all registered consumers.
///
/// Consumers register with [`subscribe`](ChangeDispatcher::subscribe) and
/// unregister by dropping the returned receiver; registration is independent
/// of engine lifecycle. A slow or dead consumer never affects delivery to
/// the others.
#[derive(Debug, Clone)]
pub struct ChangeDispatcher {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<ChangeEvent>>>>,
    state: SharedState,
    republish_delay: Duration,
}

impl ChangeDispatcher {
    pub fn new(state: SharedState, republish_delay: Duration) -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            state,
            republish_delay,
        }
    }

    /// Register a new consumer. Drop the receiver to unregister; the dead
    /// sender is pruned on the next publish.
    pub fn subscribe(&self) -> mpsc::Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel(CONSUMER_CHANNEL_CAPACITY);
        self.lock_subscribers().push(tx);
        rx
    }

    /// Publish an accepted change to every consumer.
    ///
    /// While in the background, one delayed re-publish of the same content is
    /// scheduled to hedge against the first delivery being lost to platform
    /// throttling on the consumer side. The hedge is skipped if the engine
    /// stops before the delay elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub fn publish(&self, event: ChangeEvent) {
        info!(
            source = ?event.source,
            content = %preview(&event.content),
            "dispatching change"
        );
        self.fan_out(&event);

        if self.state.is_background() {
            let dispatcher = self.clone();
            let delay = self.republish_delay;
            tokio::spawn(async move {
                sleep(delay).await;

                if !dispatcher.state.is_running() {
                    debug!("engine stopped before hedged re-publish; dropping");
                    return;
                }

                let hedge = ChangeEvent {
                    source: ChannelId::Republish,
                    ..event
                };
                debug!(content = %preview(&hedge.content), "hedged re-publish");
                dispatcher.fan_out(&hedge);
            });
        }
    }

    /// Number of currently registered consumers (dead ones included until
    /// the next publish prunes them).
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn fan_out(&self, event: &ChangeEvent) {
        self.lock_subscribers().retain(|tx| {
            match tx.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("consumer gone; unregistering");
                    false
                }
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // Best-effort: this consumer loses the event, the others
                    // are unaffected.
                    warn!("consumer channel full; dropping event for it");
                    true
                }
            }
        });
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::Sender<ChangeEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shorten content for log lines.
fn preview(content: &str) -> String {
    const MAX: usize = 30;
    if content.chars().count() <= MAX {
        content.to_string()
    } else {
        let head: String = content.chars().take(MAX).collect();
        format!("{head}...")
    }
}
