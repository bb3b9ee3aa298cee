// src/engine/mod.rs

//! Orchestration around the sensor.
//!
//! - [`core`] holds the synchronous `SensorCore`: it evaluates one poll against
//!   the cursor store and commits the resulting cursor on request.
//! - [`runtime`] is the async shell: it reacts to timer ticks, directory-change
//!   wakeups and shutdown, hands requests to a `RequestSink` and only then
//!   commits the cursor.

/// Why the runtime is about to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollReason {
    /// Interval timer (or the single tick of `--once`).
    Interval,
    /// The directory watcher saw a change.
    DirectoryChanged,
}

/// Runtime options used by the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Poll once, then exit. A failed poll is returned as an error.
    pub once: bool,
}

/// Events flowing into the runtime from the ticker, watcher and signal handler.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    PollRequested { reason: PollReason },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use core::SensorCore;
pub use runtime::{spawn_ticker, Runtime};
