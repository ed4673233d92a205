// src/resource/reader.rs

use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::runtime::EngineEvent;
use crate::errors::{ReadError, Result};

/// Result of one resource read.
///
/// Ephemeral: recreated on every tick, never stored beyond the detection
/// routine that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSnapshot {
    /// Current content of the resource; empty when unreadable.
    pub content: String,
    /// Whether the resource could be read at all.
    pub readable: bool,
}

impl ResourceSnapshot {
    /// Snapshot for a resource that could not be accessed.
    pub fn unreadable() -> Self {
        Self {
            content: String::new(),
            readable: false,
        }
    }

    /// Read the resource through `reader`, converting any failure into an
    /// unreadable snapshot.
    ///
    /// This is the only place read errors are absorbed; callers never see
    /// them. A failed read is logged and treated as "no change".
    pub fn capture(reader: &dyn ResourceReader) -> Self {
        match reader.read() {
            Ok(content) => Self {
                content,
                readable: true,
            },
            Err(err) => {
                debug!(error = %err, "resource read failed; treating as no change");
                Self::unreadable()
            }
        }
    }
}

/// Read access to the shared external resource.
///
/// Implementations must be stateless and safe to call concurrently from any
/// observation channel. `read` may block briefly (it touches the platform)
/// but must never have side effects on the resource.
pub trait ResourceReader: Send + Sync + 'static {
    fn read(&self) -> std::result::Result<String, ReadError>;
}

/// Native change-notification subscription for a resource.
///
/// The platform may or may not deliver these reliably (in background mode it
/// often does not); the engine treats the subscription as one redundant
/// observation channel among several, never the sole one.
pub trait ChangeNotifier: Send + 'static {
    /// Register the subscription. Every native change signal must result in
    /// one `EngineEvent::Tick` with `ChannelId::Native` sent on `events_tx`.
    ///
    /// The subscription stays live until `unsubscribe` is called.
    fn subscribe(&mut self, events_tx: mpsc::Sender<EngineEvent>) -> Result<()>;

    /// Tear the subscription down. Must be idempotent.
    fn unsubscribe(&mut self);
}
