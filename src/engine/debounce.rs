// src/engine/debounce.rs

//! Debounce gate: minimum elapsed time between two accepted changes.
//!
//! The check is time-only by design. A candidate arriving inside the window
//! is rejected even when its content differs from the last accepted one;
//! this suppresses duplicate signals from several channels observing the
//! same true change, at the cost of dropping a genuine second change that
//! arrives in quick succession. The window is shorter while the process is
//! in the background, where ticks are rarer and double-fires less likely.

use std::time::{Duration, Instant};

/// Returns true iff `candidate` is far enough after the last acceptance.
///
/// A candidate with no prior acceptance is always accepted.
pub fn accept(candidate: Instant, last_accepted: Option<Instant>, window: Duration) -> bool {
    match last_accepted {
        None => true,
        Some(prev) => candidate.saturating_duration_since(prev) >= window,
    }
}
