// src/resource/file.rs

use std::fs;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::engine::runtime::{ChannelId, EngineEvent};
use crate::errors::{ReadError, Result};
use crate::resource::reader::{ChangeNotifier, ResourceReader};

/// File-backed resource: the watched file plays the role of the
/// environment-owned shared buffer. Any process may rewrite it at any time.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceReader for FileResource {
    fn read(&self) -> std::result::Result<String, ReadError> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content)
    }
}

/// Native change notification for a [`FileResource`], backed by `notify`.
///
/// Watches the file's parent directory (non-recursive) so that replace-by-
/// rename writes are seen too, and forwards any event touching the file as a
/// `ChannelId::Native` tick. Content comparison downstream makes precise
/// event filtering unnecessary.
pub struct FileNotifier {
    path: PathBuf,
    watcher: Option<RecommendedWatcher>,
    forward: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for FileNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileNotifier")
            .field("path", &self.path)
            .field("subscribed", &self.watcher.is_some())
            .finish()
    }
}

impl FileNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watcher: None,
            forward: None,
        }
    }
}

impl ChangeNotifier for FileNotifier {
    fn subscribe(&mut self, events_tx: mpsc::Sender<EngineEvent>) -> Result<()> {
        self.unsubscribe();

        let path = self
            .path
            .canonicalize()
            .unwrap_or_else(|_| self.path.clone()); // best-effort
        let watch_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // Channel from the blocking notify callback into the async world.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

        // Closure called synchronously by notify whenever an event arrives.
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("clipwatch: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("clipwatch: native watch error: {err}");
                }
            },
            Config::default(),
        )?;

        watcher.watch(&watch_root, RecursiveMode::NonRecursive)?;

        info!(path = ?path, "native change subscription registered");

        // Async task that consumes notify events and forwards native ticks.
        let target = path.clone();
        let forward = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                trace!(?event, "received notify event");

                if !event.paths.iter().any(|p| p == &target) {
                    continue;
                }

                if let Err(err) = events_tx
                    .send(EngineEvent::Tick {
                        channel: ChannelId::Native,
                    })
                    .await
                {
                    warn!("failed to forward native tick: {err}");
                    // If the engine channel is closed, there's no point
                    // keeping the forwarding loop alive.
                    return;
                }
            }

            debug!("native event forwarding loop ended");
        });

        self.watcher = Some(watcher);
        self.forward = Some(forward);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            drop(watcher);
            debug!(path = ?self.path, "native change subscription removed");
        }
        if let Some(forward) = self.forward.take() {
            forward.abort();
        }
    }
}
