// src/watch/watcher.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::{PollReason, RuntimeEvent};
use crate::sensor::ItemPattern;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `dir` (non-recursively) and request a poll whenever an entry
/// matching `pattern` is created, modified or removed.
///
/// The poll re-derives everything from the directory, so a dropped wakeup
/// (channel full) costs nothing: a poll is already pending.
pub fn spawn_watcher(
    dir: impl Into<PathBuf>,
    pattern: ItemPattern,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let dir = dir.into();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !is_relevant(&event, &pattern) {
                    return;
                }
                let wake = RuntimeEvent::PollRequested {
                    reason: PollReason::DirectoryChanged,
                };
                // Full: a poll is already queued. Closed: the runtime is gone.
                let _ = runtime_tx.try_send(wake);
            }
            Err(err) => warn!(error = %err, "directory watch error"),
        },
        Config::default(),
    )?;

    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching directory {dir:?}"))?;

    info!(?dir, "directory watcher started");

    Ok(WatcherHandle { _inner: watcher })
}

fn is_relevant(event: &Event, pattern: &ItemPattern) -> bool {
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    kind_matters
        && event.paths.iter().any(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.matches(n))
        })
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    use super::*;

    fn json_pattern() -> ItemPattern {
        ItemPattern::new("*.json").expect("valid glob")
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn matching_create_modify_remove_wake_the_runtime() {
        let pattern = json_pattern();
        for kind in [
            EventKind::Create(CreateKind::File),
            EventKind::Modify(ModifyKind::Any),
            EventKind::Remove(RemoveKind::File),
        ] {
            assert!(is_relevant(&event(kind, "/srv/adhoc/a.json"), &pattern), "{kind:?}");
        }
    }

    #[test]
    fn non_matching_names_are_ignored() {
        let create = event(EventKind::Create(CreateKind::File), "/srv/adhoc/notes.txt");
        assert!(!is_relevant(&create, &json_pattern()));
    }

    #[test]
    fn access_events_are_ignored() {
        let read = event(EventKind::Access(AccessKind::Any), "/srv/adhoc/a.json");
        assert!(!is_relevant(&read, &json_pattern()));
    }

    #[test]
    fn any_matching_path_in_a_multi_path_event_counts() {
        let rename = event(EventKind::Modify(ModifyKind::Any), "/srv/adhoc/a.tmp")
            .add_path(PathBuf::from("/srv/adhoc/a.json"));
        assert!(is_relevant(&rename, &json_pattern()));
    }
}
