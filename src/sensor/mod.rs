// src/sensor/mod.rs

//! Change detection over a directory of request documents.
//!
//! On each [`poll`] the sensor:
//! - lists the source directory and keeps files matching the item pattern,
//! - fingerprints them (mtime or content hash),
//! - diffs the fingerprints against the snapshot decoded from the prior cursor,
//! - parses new-or-changed documents into [`ExecutionRequest`]s,
//! - returns the new snapshot as the next cursor.
//!
//! Cursor persistence is the caller's job; [`store`] has the two stores the
//! runtime uses.

pub mod fingerprint;
pub mod item;
pub mod poll;
pub mod request;
pub mod snapshot;
pub mod store;

pub use item::{Fingerprint, ItemPattern, WorkItem};
pub use poll::{poll, PollOptions, PollOutcome};
pub use request::{dedup_key, ExecutionRequest};
pub use snapshot::Snapshot;
pub use store::{CursorStore, FileCursorStore, MemoryCursorStore, CURSOR_DIR};
