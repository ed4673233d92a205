// src/errors.rs

//! Crate-wide error types.
//!
//! The recoverable failure taxonomy of the engine lives here as structured
//! `thiserror` enums; wiring-level code (config loading, CLI) uses `anyhow`,
//! re-exported below so call sites have a single import path.

use thiserror::Error;

pub use anyhow::{Error, Result};

/// Failure to read the shared external resource.
///
/// Never fatal: the detection routine treats any read failure as "no change"
/// and the next scheduled tick retries naturally.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The resource backend reported an I/O problem (missing file, permission
    /// denied, ...).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The resource exists but its content could not be interpreted.
    #[error("resource content unavailable: {0}")]
    Unavailable(String),
}

/// Failure to determine foreground/background execution state.
///
/// The tracker keeps the previous flag value on error; a failed probe never
/// flips state.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("foreground probe failed: {0}")]
    Failed(String),
}
