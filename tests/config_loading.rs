// tests/config_loading.rs

use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use watchpoll::build_sensor_core;
use watchpoll::config::{load_and_validate, parse_duration, ConfigFile};
use watchpoll::errors::WatchpollError;
use watchpoll::fs::mock::MockFileSystem;
use watchpoll::types::{CursorStorageMode, FingerprintMode};
use watchpoll_test_utils::builders::ConfigFileBuilder;
use watchpoll_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn config_file(contents: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    write!(file, "{contents}")?;
    Ok(file)
}

fn expect_config_error(contents: &str, needle: &str) -> TestResult {
    let file = config_file(contents)?;
    match load_and_validate(file.path()) {
        Err(WatchpollError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn minimal_config_gets_defaults() -> TestResult {
    init_tracing();
    let file = config_file(
        r#"
[sensor]
name = "adhoc_sensor"
directory = "adhoc"

[job]
name = "adhoc_job"
"#,
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.sensor.pattern, "*.json");
    assert_eq!(cfg.sensor.fingerprint, FingerprintMode::Mtime);
    assert_eq!(cfg.sensor.cursor_storage, CursorStorageMode::File);
    assert_eq!(FingerprintMode::default(), FingerprintMode::Mtime);
    assert_eq!(CursorStorageMode::default(), CursorStorageMode::File);
    assert_eq!(cfg.sensor.name_key, "name");
    assert!(!cfg.sensor.watch);
    assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
    assert_eq!(cfg.key_prefix(), "adhoc_job");
    Ok(())
}

#[test]
fn full_config_is_parsed() -> TestResult {
    init_tracing();
    let file = config_file(
        r#"
[sensor]
name = "adhoc_sensor"
directory = "/srv/requests"
pattern = "*.req.json"
fingerprint = "hash"
interval = "500ms"
watch = true
cursor_storage = "memory"
name_key = "filename"

[job]
name = "adhoc_job"
op = "movie_embeddings"
"#,
    )?;

    let cfg = load_and_validate(file.path())?;

    assert_eq!(cfg.sensor.fingerprint, FingerprintMode::Hash);
    assert_eq!(cfg.sensor.cursor_storage, CursorStorageMode::Memory);
    assert_eq!(cfg.poll_interval(), Duration::from_millis(500));
    assert!(cfg.sensor.watch);
    assert_eq!(cfg.sensor.name_key, "filename");
    assert_eq!(cfg.key_prefix(), "movie_embeddings");
    Ok(())
}

#[test]
fn explicit_key_prefix_wins() {
    let cfg = ConfigFileBuilder::new("adhoc")
        .op("movie_embeddings")
        .key_prefix("embeddings")
        .build();
    assert_eq!(cfg.key_prefix(), "embeddings");
}

#[test]
fn unknown_fingerprint_mode_is_a_toml_error() -> TestResult {
    init_tracing();
    let file = config_file(
        r#"
[sensor]
name = "s"
directory = "d"
fingerprint = "ctime"

[job]
name = "j"
"#,
    )?;

    assert!(matches!(
        load_and_validate(file.path()),
        Err(WatchpollError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn missing_job_section_is_a_toml_error() -> TestResult {
    init_tracing();
    let file = config_file(
        r#"
[sensor]
name = "s"
directory = "d"
"#,
    )?;

    assert!(matches!(
        load_and_validate(file.path()),
        Err(WatchpollError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn invalid_values_are_config_errors() -> TestResult {
    init_tracing();
    expect_config_error(
        "[sensor]\nname = \"a/b\"\ndirectory = \"d\"\n[job]\nname = \"j\"\n",
        "path separators",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"  \"\n[job]\nname = \"j\"\n",
        "directory",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"d\"\npattern = \"[\"\n[job]\nname = \"j\"\n",
        "not a valid glob",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"d\"\ninterval = \"10 parsecs\"\n[job]\nname = \"j\"\n",
        "interval",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"d\"\ninterval = \"0s\"\n[job]\nname = \"j\"\n",
        "greater than zero",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"d\"\ninterval = \"6000000000000000h\"\n[job]\nname = \"j\"\n",
        "duration too large",
    )?;
    expect_config_error(
        "[sensor]\nname = \"s\"\ndirectory = \"d\"\n[job]\nname = \"j\"\nop = \"\"\n",
        "[job].op",
    )?;
    Ok(())
}

#[test]
fn builder_rejects_empty_job_name() {
    let raw = ConfigFileBuilder::new("adhoc").job("").raw();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(WatchpollError::ConfigError(_))
    ));
}

#[test]
fn durations_parse_with_units() {
    assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
    assert_eq!(parse_duration(" 30s "), Ok(Duration::from_secs(30)));
    assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
    assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    assert!(parse_duration("30").is_err());
    assert!(parse_duration("").is_err());
    assert!(parse_duration("5d").is_err());
    assert_eq!(
        parse_duration("6000000000000000h"),
        Err("duration too large: '6000000000000000h'".to_string())
    );
    assert_eq!(
        parse_duration("18446744073709551615s"),
        Ok(Duration::from_secs(u64::MAX))
    );
}

#[test]
fn sensor_core_resolves_directory_against_root() -> TestResult {
    init_tracing();
    let fs = Arc::new(MockFileSystem::new());

    let relative = ConfigFileBuilder::new("adhoc").build();
    let core = build_sensor_core(&relative, Path::new("/work"), fs.clone())?;
    assert_eq!(core.source_dir(), Path::new("/work/adhoc"));
    assert_eq!(core.name(), "adhoc_sensor");

    let absolute = ConfigFileBuilder::new("/srv/requests").build();
    let core = build_sensor_core(&absolute, Path::new("/work"), fs)?;
    assert_eq!(core.source_dir(), Path::new("/srv/requests"));
    Ok(())
}

#[test]
fn demo_config_loads_and_polls() -> TestResult {
    init_tracing();
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config_path = manifest_dir.join("demos/adhoc/Watchpoll.toml");
    let cfg = load_and_validate(&config_path)?;

    assert!(cfg.sensor.watch);
    assert_eq!(cfg.sensor.name_key, "filename");
    assert_eq!(cfg.key_prefix(), "movie_embeddings");

    let root = watchpoll::config_root_dir(&config_path);
    let core = build_sensor_core(&cfg, &root, Arc::new(watchpoll::fs::RealFileSystem))?;
    let outcome = core.evaluate()?;

    let filenames: Vec<&serde_json::Value> = outcome
        .requests
        .iter()
        .map(|r| &r.payload["filename"])
        .collect();
    assert_eq!(filenames, vec![&serde_json::json!("high_ratings.json")]);
    assert!(outcome.requests[0].payload.get("name").is_none());
    Ok(())
}
