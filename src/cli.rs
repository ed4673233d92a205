// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `clipwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clipwatch",
    version,
    about = "Watch a shared external buffer and report every accepted change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path of the file standing in for the shared external resource.
    ///
    /// Other processes may rewrite this file at any time; every accepted
    /// change is printed to stdout.
    #[arg(long, value_name = "PATH")]
    pub resource: String,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Clipwatch.toml` is used when present, otherwise built-in
    /// defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CLIPWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective engine config, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
