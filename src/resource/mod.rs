// src/resource/mod.rs

//! Access to the shared external resource.
//!
//! This module is responsible for:
//! - The read seam (`ResourceReader`) and the per-tick snapshot type.
//! - The native change-notification seam (`ChangeNotifier`).
//! - The built-in file-backed binding (`file.rs`), which treats a file on
//!   disk as the environment-owned mutable buffer and uses `notify` for the
//!   native change signal.
//!
//! It does **not** know about debouncing or dispatch; it only exposes the
//! platform primitives the engine observes through.

pub mod file;
pub mod reader;

pub use file::{FileNotifier, FileResource};
pub use reader::{ChangeNotifier, ResourceReader, ResourceSnapshot};
