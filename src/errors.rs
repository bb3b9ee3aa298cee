// src/errors.rs

//! Crate-wide error types.
//!
//! [`WatchpollError`] is what a fatal failure looks like to callers. The two
//! recoverable kinds ([`ItemParseError`], [`CursorDecodeError`]) never abort a
//! poll; they are logged and reported next to the poll result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchpollError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("source directory {path:?} is unavailable: {reason}")]
    DirectoryUnavailable { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A single work item could not be fingerprinted or parsed.
///
/// The item is left out of the new cursor so the next poll retries it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("skipping item '{name}': {reason}")]
pub struct ItemParseError {
    pub name: String,
    pub reason: String,
}

/// The prior cursor was not a valid snapshot.
#[derive(Error, Debug)]
#[error("prior cursor could not be decoded: {0}")]
pub struct CursorDecodeError(#[from] pub serde_json::Error);

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchpollError>;
