// tests/logging_filter.rs

use watchpoll::cli::LogLevel;
use watchpoll::logging::build_filter;

#[test]
fn cli_level_overrides_environment() -> anyhow::Result<()> {
    let filter = build_filter(Some(LogLevel::Debug), Some("watchpoll=trace"))?;
    assert_eq!(filter.to_string(), "debug");
    Ok(())
}

#[test]
fn environment_directives_are_used_when_no_cli_level() -> anyhow::Result<()> {
    let filter = build_filter(None, Some("watchpoll=debug"))?;
    assert_eq!(filter.to_string(), "watchpoll=debug");
    Ok(())
}

#[test]
fn blank_or_missing_environment_falls_back_to_info() -> anyhow::Result<()> {
    assert_eq!(build_filter(None, None)?.to_string(), "info");
    assert_eq!(build_filter(None, Some("   "))?.to_string(), "info");
    Ok(())
}

#[test]
fn invalid_environment_directives_are_rejected() {
    let err = build_filter(None, Some("watchpoll=loud")).unwrap_err();
    assert!(format!("{err:#}").contains("WATCHPOLL_LOG"), "got: {err:#}");
}
