// tests/poll_real_fs.rs

use std::error::Error;
use std::fs::{self, File};
use std::time::{Duration, UNIX_EPOCH};

use serde_json::{json, Value};
use tempfile::tempdir;

use watchpoll::errors::WatchpollError;
use watchpoll::fs::RealFileSystem;
use watchpoll::sensor::{poll, PollOptions};
use watchpoll_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn pin_mtime(path: &std::path::Path, secs: u64) -> std::io::Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
}

#[test]
fn detects_new_and_changed_files_on_disk() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let options = PollOptions::new()?;
    let fs = RealFileSystem;

    let empty = poll(&fs, None, dir.path(), &options)?;
    assert!(empty.requests.is_empty());

    let a = dir.path().join("a.json");
    fs::write(&a, r#"{"x":1}"#)?;
    pin_mtime(&a, 1_650_000_000)?;

    let first = poll(&fs, Some(&empty.cursor), dir.path(), &options)?;
    assert_eq!(first.requests.len(), 1);
    assert_eq!(
        Value::Object(first.requests[0].payload.clone()),
        json!({"name": "a.json", "x": 1})
    );

    let idle = poll(&fs, Some(&first.cursor), dir.path(), &options)?;
    assert!(idle.requests.is_empty());
    assert_eq!(idle.cursor, first.cursor);

    fs::write(&a, r#"{"x":2}"#)?;
    pin_mtime(&a, 1_650_000_060)?;

    let changed = poll(&fs, Some(&idle.cursor), dir.path(), &options)?;
    assert_eq!(changed.requests.len(), 1);
    assert_eq!(changed.requests[0].payload["x"], json!(2));
    Ok(())
}

#[test]
fn subdirectories_and_other_extensions_are_skipped() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("nested.json"))?;
    fs::write(dir.path().join("notes.txt"), "not a request")?;
    fs::write(dir.path().join("a.json"), "{}")?;

    let outcome = poll(&RealFileSystem, None, dir.path(), &PollOptions::new()?)?;

    assert_eq!(outcome.requests.len(), 1);
    assert_eq!(outcome.snapshot.len(), 1);
    Ok(())
}

#[test]
fn missing_directory_is_reported() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let missing = dir.path().join("does-not-exist");

    let result = poll(&RealFileSystem, None, &missing, &PollOptions::new()?);

    assert!(matches!(
        result,
        Err(WatchpollError::DirectoryUnavailable { .. })
    ));
    Ok(())
}
