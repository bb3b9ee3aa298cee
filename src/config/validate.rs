// src/config/validate.rs

use std::time::Duration;

use globset::Glob;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, JobSection, RawConfigFile, SensorSection};
use crate::errors::{Result, WatchpollError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WatchpollError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_sensor(&raw.sensor)?;
        validate_job(&raw.job)?;
        let interval = validate_interval(&raw.sensor.interval)?;
        Ok(ConfigFile::new_unchecked(raw.sensor, raw.job, interval))
    }
}

fn config_error(msg: impl Into<String>) -> WatchpollError {
    WatchpollError::ConfigError(msg.into())
}

fn validate_sensor(sensor: &SensorSection) -> Result<()> {
    let name = sensor.name.trim();
    if name.is_empty() {
        return Err(config_error("[sensor].name must not be empty"));
    }
    // The name doubles as the cursor file stem.
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(config_error(format!(
            "[sensor].name '{}' must not contain path separators",
            sensor.name
        )));
    }

    if sensor.directory.trim().is_empty() {
        return Err(config_error("[sensor].directory must not be empty"));
    }

    Glob::new(&sensor.pattern).map_err(|e| {
        config_error(format!(
            "[sensor].pattern '{}' is not a valid glob: {}",
            sensor.pattern, e
        ))
    })?;

    if sensor.name_key.trim().is_empty() {
        return Err(config_error("[sensor].name_key must not be empty"));
    }

    Ok(())
}

fn validate_job(job: &JobSection) -> Result<()> {
    if job.name.trim().is_empty() {
        return Err(config_error("[job].name must not be empty"));
    }
    if matches!(job.op.as_deref(), Some(op) if op.trim().is_empty()) {
        return Err(config_error("[job].op must not be empty when given"));
    }
    if matches!(job.key_prefix.as_deref(), Some(p) if p.trim().is_empty()) {
        return Err(config_error("[job].key_prefix must not be empty when given"));
    }
    Ok(())
}

fn validate_interval(raw: &str) -> Result<Duration> {
    let interval = parse_duration(raw)
        .map_err(|e| config_error(format!("[sensor].interval: {e}")))?;
    if interval.is_zero() {
        return Err(config_error("[sensor].interval must be greater than zero"));
    }
    Ok(interval)
}
