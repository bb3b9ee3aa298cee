use std::fmt;

use serde::Deserialize;

/// How a work item's "has it changed" value is computed.
///
/// - `Mtime`: last modification time (default). Cheap, but two edits within
///   the filesystem's timestamp granularity look identical.
/// - `Hash`: blake3 digest of the file content. Reads every matching file on
///   every poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    #[default]
    Mtime,
    Hash,
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintMode::Mtime => f.write_str("mtime"),
            FingerprintMode::Hash => f.write_str("hash"),
        }
    }
}

/// Where the runtime keeps the cursor between polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStorageMode {
    /// Store the cursor in a file (`.watchpoll/cursors/<sensor>.json`).
    #[default]
    File,
    /// Keep the cursor in memory only (lost on restart).
    Memory,
}
