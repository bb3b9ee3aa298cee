// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::{CursorStorageMode, FingerprintMode};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [sensor]
/// name = "adhoc_sensor"
/// directory = "adhoc"
/// pattern = "*.json"
/// fingerprint = "mtime"
/// interval = "30s"
///
/// [job]
/// name = "adhoc_job"
/// op = "movie_embeddings"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub sensor: SensorSection,
    pub job: JobSection,
}

/// Validated configuration.
///
/// Only obtainable through `ConfigFile::try_from(RawConfigFile)`, which runs
/// the checks in `validate.rs`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub sensor: SensorSection,
    pub job: JobSection,
    poll_interval: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        sensor: SensorSection,
        job: JobSection,
        poll_interval: Duration,
    ) -> Self {
        Self {
            sensor,
            job,
            poll_interval,
        }
    }

    /// Parsed `[sensor].interval`.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Prefix used when building deduplication keys.
    ///
    /// Falls back to the op name, then to the job name.
    pub fn key_prefix(&self) -> &str {
        self.job
            .key_prefix
            .as_deref()
            .or(self.job.op.as_deref())
            .unwrap_or(&self.job.name)
    }
}

/// `[sensor]` section: what to watch and how to detect changes.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorSection {
    /// Sensor name. Also names the cursor file, so it must be a plain file stem.
    pub name: String,

    /// Directory holding the request documents. Relative paths are resolved
    /// against the directory containing the config file.
    pub directory: String,

    /// Glob matched against file names inside `directory`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    #[serde(default)]
    pub fingerprint: FingerprintMode,

    /// Duration string such as `"30s"`, `"500ms"` or `"5m"`.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Wake the poller early when the directory changes.
    #[serde(default)]
    pub watch: bool,

    #[serde(default)]
    pub cursor_storage: CursorStorageMode,

    /// Payload key that receives the triggering item's name.
    #[serde(default = "default_name_key")]
    pub name_key: String,
}

/// `[job]` section: which job the emitted requests target.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    pub name: String,

    /// When set, payloads are nested as `ops.<op>.config` in the run config.
    #[serde(default)]
    pub op: Option<String>,

    #[serde(default)]
    pub key_prefix: Option<String>,
}

fn default_pattern() -> String {
    "*.json".to_string()
}

fn default_interval() -> String {
    "30s".to_string()
}

fn default_name_key() -> String {
    "name".to_string()
}
