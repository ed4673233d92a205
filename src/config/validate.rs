// src/config/validate.rs

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::config::model::ConfigFile;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - no cadence is zero (a zero-interval loop would spin)
/// - no debounce window or republish delay is zero
///
/// It warns (but does not reject) when:
/// - the background debounce window exceeds the foreground one
/// - the background secondary cadence exceeds the foreground one
///
/// Those inversions are legal but defeat the point of the background mode.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_nonzero(cfg)?;
    warn_on_inverted_background_values(cfg);
    Ok(())
}

fn validate_nonzero(cfg: &ConfigFile) -> Result<()> {
    let e = &cfg.engine;
    let fields: [(&str, u64); 7] = [
        ("primary_cadence_ms", e.primary_cadence_ms),
        ("secondary_cadence_ms", e.secondary_cadence_ms),
        (
            "background_secondary_cadence_ms",
            e.background_secondary_cadence_ms,
        ),
        ("debounce_window_ms", e.debounce_window_ms),
        (
            "background_debounce_window_ms",
            e.background_debounce_window_ms,
        ),
        ("republish_delay_ms", e.republish_delay_ms),
        ("tracker_cadence_ms", e.tracker_cadence_ms),
    ];

    for (name, value) in fields {
        if value == 0 {
            return Err(anyhow!("[engine].{name} must be >= 1 (got 0)"));
        }
    }

    Ok(())
}

fn warn_on_inverted_background_values(cfg: &ConfigFile) {
    let e = &cfg.engine;

    if e.background_debounce_window_ms > e.debounce_window_ms {
        warn!(
            background = e.background_debounce_window_ms,
            foreground = e.debounce_window_ms,
            "background debounce window is larger than the foreground one"
        );
    }

    if e.background_secondary_cadence_ms > e.secondary_cadence_ms {
        warn!(
            background = e.background_secondary_cadence_ms,
            foreground = e.secondary_cadence_ms,
            "background secondary cadence is slower than the foreground one"
        );
    }
}
