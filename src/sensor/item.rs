// src/sensor/item.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Comparable "has this item changed" value.
///
/// Renderings never contain `_`, which keeps deduplication keys unambiguous
/// (see [`crate::sensor::request::dedup_key`]).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One request document that was found to be new or changed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub name: String,
    pub fingerprint: Fingerprint,
    pub payload: Map<String, Value>,
}

/// Parse a request document. The top level must be a JSON object.
pub fn parse_document(contents: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(contents).context("invalid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!(
            "expected a JSON object at the top level, found {}",
            json_kind(&other)
        ),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Compiled glob deciding which directory entries are work items.
///
/// Matched against the bare file name, not the full path.
#[derive(Clone)]
pub struct ItemPattern {
    source: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for ItemPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemPattern").field(&self.source).finish()
    }
}

impl ItemPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern)
            .with_context(|| format!("compiling item pattern {:?}", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}
