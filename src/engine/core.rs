// src/engine/core.rs

//! Synchronous sensor core.
//!
//! Splits a tick into `evaluate` (read cursor, poll, no writes) and `commit`
//! (persist the new cursor) so the shell can deliver requests in between.
//! Nothing here touches Tokio or channels.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::sensor::{poll, CursorStore, PollOptions, PollOutcome};

pub struct SensorCore {
    name: String,
    source_dir: PathBuf,
    options: PollOptions,
    fs: Arc<dyn FileSystem>,
    store: Box<dyn CursorStore>,
}

impl std::fmt::Debug for SensorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorCore")
            .field("name", &self.name)
            .field("source_dir", &self.source_dir)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SensorCore {
    pub fn new(
        name: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        options: PollOptions,
        fs: Arc<dyn FileSystem>,
        store: Box<dyn CursorStore>,
    ) -> Self {
        Self {
            name: name.into(),
            source_dir: source_dir.into(),
            options,
            fs,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Load the stored cursor and run one poll. Does not persist anything.
    pub fn evaluate(&self) -> Result<PollOutcome> {
        let prior = self.store.load()?;
        debug!(
            sensor = %self.name,
            has_cursor = prior.is_some(),
            "evaluating sensor"
        );
        poll(
            self.fs.as_ref(),
            prior.as_deref(),
            &self.source_dir,
            &self.options,
        )
    }

    /// Persist the cursor of a successfully delivered poll.
    pub fn commit(&mut self, outcome: &PollOutcome) -> Result<()> {
        self.store.save(&outcome.cursor)?;
        debug!(sensor = %self.name, items = outcome.snapshot.len(), "committed cursor");
        Ok(())
    }

    /// Drop the stored cursor (`--reset-cursor`).
    pub fn reset(&mut self) -> Result<()> {
        self.store.clear()?;
        info!(sensor = %self.name, "cursor reset; next poll starts from an empty history");
        Ok(())
    }
}
