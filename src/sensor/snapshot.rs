// src/sensor/snapshot.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CursorDecodeError, Result};
use crate::sensor::item::Fingerprint;

/// Item name -> fingerprint, as of the last successful poll.
///
/// Serialized as a JSON object; `BTreeMap` keeps the encoding stable for a
/// given set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Fingerprint>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a cursor. `None` and blank strings mean "start of history".
    pub fn from_cursor(cursor: Option<&str>) -> std::result::Result<Self, CursorDecodeError> {
        match cursor {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(raw)?),
            _ => Ok(Self::new()),
        }
    }

    pub fn to_cursor(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, name: &str) -> Option<&Fingerprint> {
        self.entries.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, fingerprint: Fingerprint) {
        self.entries.insert(name.into(), fingerprint);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// True when `name` is unseen or was seen with a different fingerprint.
    pub fn is_changed(&self, name: &str, fingerprint: &Fingerprint) -> bool {
        self.entries.get(name) != Some(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
