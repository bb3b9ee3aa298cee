// src/sensor/poll.rs

//! The change-detection pass itself.
//!
//! [`poll`] is a pure function of `(prior cursor, directory contents)`. It
//! never writes anything; the caller decides whether and where to persist
//! the returned cursor.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::errors::{ItemParseError, Result, WatchpollError};
use crate::fs::FileSystem;
use crate::sensor::fingerprint::compute_fingerprint;
use crate::sensor::item::{parse_document, Fingerprint, ItemPattern, WorkItem};
use crate::sensor::request::ExecutionRequest;
use crate::sensor::snapshot::Snapshot;
use crate::types::FingerprintMode;

/// Knobs for a single poll.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub pattern: ItemPattern,
    pub fingerprint: FingerprintMode,
    /// Payload key that receives the item name.
    pub name_key: String,
    /// Leading component of every deduplication key.
    pub key_prefix: String,
}

impl PollOptions {
    /// Defaults: `*.json`, mtime fingerprints, `name` key, no key prefix.
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: ItemPattern::new("*.json")?,
            fingerprint: FingerprintMode::Mtime,
            name_key: "name".to_string(),
            key_prefix: String::new(),
        })
    }

    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Ok(Self {
            pattern: ItemPattern::new(&cfg.sensor.pattern)?,
            fingerprint: cfg.sensor.fingerprint,
            name_key: cfg.sensor.name_key.clone(),
            key_prefix: cfg.key_prefix().to_string(),
        })
    }

    pub fn with_fingerprint(mut self, mode: FingerprintMode) -> Self {
        self.fingerprint = mode;
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Result of one poll.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// One request per new-or-changed item, in directory enumeration order.
    pub requests: Vec<ExecutionRequest>,
    /// Serialized `snapshot`, to be handed back on the next poll.
    pub cursor: String,
    pub snapshot: Snapshot,
    /// Items that could not be fingerprinted or parsed; retried next poll.
    pub skipped: Vec<ItemParseError>,
    /// The prior cursor was malformed and was treated as empty.
    pub cursor_reset: bool,
}

/// Diff `source_dir` against the snapshot in `prior_cursor`.
///
/// Fails only when the directory cannot be listed, in which case nothing is
/// returned and the caller must keep its prior cursor.
pub fn poll(
    fs: &dyn FileSystem,
    prior_cursor: Option<&str>,
    source_dir: &Path,
    options: &PollOptions,
) -> Result<PollOutcome> {
    let (previous, cursor_reset) = match Snapshot::from_cursor(prior_cursor) {
        Ok(snapshot) => (snapshot, false),
        Err(err) => {
            warn!(error = %err, "treating prior cursor as empty; every item will be re-triggered");
            (Snapshot::new(), true)
        }
    };

    let entries = fs
        .read_dir(source_dir)
        .map_err(|e| WatchpollError::DirectoryUnavailable {
            path: source_dir.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

    let mut current = Snapshot::new();
    let mut requests = Vec::new();
    let mut skipped = Vec::new();

    for (name, path) in matching_items(fs, entries, &options.pattern) {
        let fingerprint = match compute_fingerprint(fs, &path, options.fingerprint) {
            Ok(fp) => fp,
            Err(e) => {
                skip(&mut skipped, name, format!("fingerprint failed: {e:#}"));
                continue;
            }
        };

        if !previous.is_changed(&name, &fingerprint) {
            debug!(item = %name, %fingerprint, "unchanged");
            current.insert(name, fingerprint);
            continue;
        }

        match load_item(fs, &path, &name, &fingerprint) {
            Ok(item) => {
                debug!(
                    item = %name,
                    %fingerprint,
                    new = !previous.contains(&name),
                    "item changed; emitting request"
                );
                current.insert(name, fingerprint);
                requests.push(ExecutionRequest::for_item(
                    item,
                    &options.key_prefix,
                    &options.name_key,
                ));
            }
            Err(reason) => skip(&mut skipped, name, reason),
        }
    }

    let cursor = current.to_cursor()?;

    info!(
        dir = ?source_dir,
        items = current.len(),
        requests = requests.len(),
        skipped = skipped.len(),
        "poll complete"
    );

    Ok(PollOutcome {
        requests,
        cursor,
        snapshot: current,
        skipped,
        cursor_reset,
    })
}

/// Regular files with a UTF-8 name matching `pattern`, in enumeration order.
fn matching_items(
    fs: &dyn FileSystem,
    entries: Vec<PathBuf>,
    pattern: &ItemPattern,
) -> Vec<(String, PathBuf)> {
    entries
        .into_iter()
        .filter_map(|path| {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    debug!(?path, "ignoring entry without a UTF-8 file name");
                    return None;
                }
            };
            if !pattern.matches(&name) || !fs.is_file(&path) {
                debug!(?path, "ignoring non-matching entry");
                return None;
            }
            Some((name, path))
        })
        .collect()
}

fn load_item(
    fs: &dyn FileSystem,
    path: &Path,
    name: &str,
    fingerprint: &Fingerprint,
) -> std::result::Result<WorkItem, String> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| format!("read failed: {e:#}"))?;
    let payload = parse_document(&contents).map_err(|e| format!("{e:#}"))?;
    Ok(WorkItem {
        name: name.to_string(),
        fingerprint: fingerprint.clone(),
        payload,
    })
}

fn skip(skipped: &mut Vec<ItemParseError>, name: String, reason: String) {
    let err = ItemParseError { name, reason };
    warn!("{err}");
    skipped.push(err);
}
