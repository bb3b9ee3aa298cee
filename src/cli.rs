// src/cli.rs

//! Command line for the `watchpoll` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchpoll`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchpoll",
    version,
    about = "Poll a directory of request documents and emit run requests for new or changed ones.",
    long_about = None
)]
pub struct CliArgs {
    /// TOML config file. Relative sensor directories and the cursor state
    /// directory resolve against its parent. Defaults to `./Watchpoll.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Poll once, print the resulting requests and exit.
    #[arg(long)]
    pub once: bool,

    /// Forget the stored cursor before the first poll, re-triggering every item.
    #[arg(long)]
    pub reset_cursor: bool,

    /// Log verbosity. Overrides `WATCHPOLL_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config and print the effective sensor setup without polling.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
