// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [engine]
/// primary_cadence_ms = 100
/// secondary_cadence_ms = 50
/// background_secondary_cadence_ms = 25
/// debounce_window_ms = 500
/// background_debounce_window_ms = 100
/// republish_delay_ms = 50
/// tracker_cadence_ms = 1000
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Engine cadences and windows from `[engine]`.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// `[engine]` section: cadences and windows for the detection engine.
///
/// All values are milliseconds. The `background_*` variants take effect while
/// the host process has lost foreground scheduling priority: the secondary
/// poll ticks faster (its timers are the ones the platform throttles) and the
/// debounce window shrinks (ticks are rarer, double-fires less likely).
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Cadence of the primary polling loop.
    #[serde(default = "default_primary_cadence_ms")]
    pub primary_cadence_ms: u64,

    /// Cadence of the secondary polling loop while in the foreground.
    #[serde(default = "default_secondary_cadence_ms")]
    pub secondary_cadence_ms: u64,

    /// Cadence of the secondary polling loop while in the background.
    #[serde(default = "default_background_secondary_cadence_ms")]
    pub background_secondary_cadence_ms: u64,

    /// Minimum elapsed time between two accepted changes (foreground).
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,

    /// Minimum elapsed time between two accepted changes (background).
    #[serde(default = "default_background_debounce_window_ms")]
    pub background_debounce_window_ms: u64,

    /// Delay before the hedged re-publish of an accepted change
    /// (background only).
    #[serde(default = "default_republish_delay_ms")]
    pub republish_delay_ms: u64,

    /// Cadence of the foreground/background execution-state probe.
    #[serde(default = "default_tracker_cadence_ms")]
    pub tracker_cadence_ms: u64,
}

fn default_primary_cadence_ms() -> u64 {
    100
}

fn default_secondary_cadence_ms() -> u64 {
    50
}

fn default_background_secondary_cadence_ms() -> u64 {
    25
}

fn default_debounce_window_ms() -> u64 {
    500
}

fn default_background_debounce_window_ms() -> u64 {
    100
}

fn default_republish_delay_ms() -> u64 {
    50
}

fn default_tracker_cadence_ms() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_cadence_ms: default_primary_cadence_ms(),
            secondary_cadence_ms: default_secondary_cadence_ms(),
            background_secondary_cadence_ms: default_background_secondary_cadence_ms(),
            debounce_window_ms: default_debounce_window_ms(),
            background_debounce_window_ms: default_background_debounce_window_ms(),
            republish_delay_ms: default_republish_delay_ms(),
            tracker_cadence_ms: default_tracker_cadence_ms(),
        }
    }
}

impl EngineConfig {
    pub fn primary_cadence(&self) -> Duration {
        Duration::from_millis(self.primary_cadence_ms)
    }

    pub fn secondary_cadence(&self) -> Duration {
        Duration::from_millis(self.secondary_cadence_ms)
    }

    pub fn background_secondary_cadence(&self) -> Duration {
        Duration::from_millis(self.background_secondary_cadence_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    pub fn background_debounce_window(&self) -> Duration {
        Duration::from_millis(self.background_debounce_window_ms)
    }

    pub fn republish_delay(&self) -> Duration {
        Duration::from_millis(self.republish_delay_ms)
    }

    pub fn tracker_cadence(&self) -> Duration {
        Duration::from_millis(self.tracker_cadence_ms)
    }
}
