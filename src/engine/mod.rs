// src/engine/mod.rs

//! The resilient change-detection engine.
//!
//! This module ties together:
//! - shared engine state (last accepted change, lifecycle and execution flags)
//! - the debounce gate
//! - the redundant observation channels (native subscription + two poll loops)
//! - the execution-state tracker (foreground/background)
//! - the single detector task that consumes all channel ticks
//! - the change dispatcher with background-hedged delivery
//! - the idempotent lifecycle controller

pub mod debounce;
pub mod dispatch;
pub mod lifecycle;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod tracker;

pub use dispatch::{ChangeDispatcher, ChangeEvent};
pub use lifecycle::Engine;
pub use runtime::{ChannelId, Detector, DetectorWindows, EngineEvent};
pub use scheduler::{spawn_poll_loop, ObservationChannel};
pub use state::{EngineState, SharedState};
pub use tracker::{spawn_tracker, ForegroundProbe, StaticProbe, ToggleProbe};
