// src/sensor/store.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::fs::FileSystem;

/// Directory (relative to the state root) holding per-sensor cursor files.
///
/// The effective path on disk is `<root>/.watchpoll/cursors/<sensor>.json`.
pub const CURSOR_DIR: &str = ".watchpoll/cursors";

/// Persists the opaque cursor string between polls.
///
/// Implementations must round-trip the string byte-for-byte.
pub trait CursorStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, cursor: &str) -> Result<()>;
    /// Forget the stored cursor; the next poll starts from an empty history.
    fn clear(&mut self) -> Result<()>;
}

/// Stores the cursor in `<root>/.watchpoll/cursors/<sensor>.json`.
pub struct FileCursorStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileCursorStore {
    pub fn new(root: &Path, sensor: &str, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: cursor_file_path(root, sensor),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn cursor_file_path(root: &Path, sensor: &str) -> PathBuf {
    root.join(CURSOR_DIR).join(format!("{sensor}.json"))
}

impl CursorStore for FileCursorStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.fs.exists(&self.path) {
            return Ok(None);
        }
        let cursor = self
            .fs
            .read_to_string(&self.path)
            .with_context(|| format!("reading cursor file at {:?}", self.path))?;
        Ok(Some(cursor))
    }

    fn save(&mut self, cursor: &str) -> Result<()> {
        self.fs
            .write(&self.path, cursor.as_bytes())
            .with_context(|| format!("writing cursor file at {:?}", self.path))
    }

    fn clear(&mut self) -> Result<()> {
        if self.fs.exists(&self.path) {
            self.fs.remove_file(&self.path)?;
            info!(path = ?self.path, "cleared stored cursor (file)");
        }
        Ok(())
    }
}

/// Keeps the cursor in memory only.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    cursor: Option<String>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
        }
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.cursor.clone())
    }

    fn save(&mut self, cursor: &str) -> Result<()> {
        self.cursor = Some(cursor.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.cursor.take().is_some() {
            info!("cleared stored cursor (memory)");
        }
        Ok(())
    }
}
