// src/watch/mod.rs

//! Optional early wakeups.
//!
//! With `[sensor].watch = true` a `notify` watcher on the source directory
//! nudges the runtime to poll as soon as a matching file changes, instead of
//! waiting for the next interval tick. It does not decide anything itself:
//! change detection stays in `sensor::poll`.

pub mod watcher;

pub use watcher::{spawn_watcher, WatcherHandle};
