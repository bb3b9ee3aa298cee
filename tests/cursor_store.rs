// tests/cursor_store.rs

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use watchpoll::fs::mock::MockFileSystem;
use watchpoll::fs::{FileSystem, RealFileSystem};
use watchpoll::sensor::store::cursor_file_path;
use watchpoll::sensor::{CursorStore, FileCursorStore, MemoryCursorStore};
use watchpoll_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn file_store_round_trips_cursor_bytes() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let mut store = FileCursorStore::new(dir.path(), "adhoc_sensor", Arc::new(RealFileSystem));

    assert_eq!(store.load()?, None);

    let cursor = r#"{"a.json":"1650000000.000000000"}"#;
    store.save(cursor)?;
    assert_eq!(store.load()?.as_deref(), Some(cursor));
    assert_eq!(
        store.path(),
        dir.path().join(".watchpoll/cursors/adhoc_sensor.json")
    );

    store.save(r#"{}"#)?;
    assert_eq!(store.load()?.as_deref(), Some("{}"));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join(".watchpoll/cursors"))?
        .map(|e| e.map(|e| e.file_name()))
        .collect::<Result<_, _>>()?;
    assert_eq!(leftovers, vec![std::ffi::OsString::from("adhoc_sensor.json")]);

    store.clear()?;
    assert_eq!(store.load()?, None);
    // Clearing twice is fine.
    store.clear()?;
    Ok(())
}

#[test]
fn file_store_keeps_sensors_apart() -> TestResult {
    init_tracing();
    let fs = Arc::new(MockFileSystem::new());
    let root = Path::new("/work");
    let mut one = FileCursorStore::new(root, "one", fs.clone());
    let mut two = FileCursorStore::new(root, "two", fs.clone());

    one.save("{\"a.json\":\"1\"}")?;
    two.save("{}")?;

    assert_eq!(one.load()?.as_deref(), Some("{\"a.json\":\"1\"}"));
    assert_eq!(two.load()?.as_deref(), Some("{}"));
    assert!(fs.exists(&cursor_file_path(root, "one")));
    Ok(())
}

#[test]
fn memory_store_starts_empty_and_clears() -> TestResult {
    init_tracing();
    let mut store = MemoryCursorStore::new();
    assert_eq!(store.load()?, None);

    store.save("{}")?;
    assert_eq!(store.load()?.as_deref(), Some("{}"));

    store.clear()?;
    assert_eq!(store.load()?, None);

    let seeded = MemoryCursorStore::with_cursor("{\"b.json\":\"2\"}");
    assert_eq!(seeded.load()?.as_deref(), Some("{\"b.json\":\"2\"}"));
    Ok(())
}
