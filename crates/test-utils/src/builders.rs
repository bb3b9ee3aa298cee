use watchpoll::config::{ConfigFile, JobSection, RawConfigFile, SensorSection};
use watchpoll::types::{CursorStorageMode, FingerprintMode};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the same defaults a minimal TOML file gets.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(directory: &str) -> Self {
        Self {
            config: RawConfigFile {
                sensor: SensorSection {
                    name: "adhoc_sensor".to_string(),
                    directory: directory.to_string(),
                    pattern: "*.json".to_string(),
                    fingerprint: FingerprintMode::Mtime,
                    interval: "30s".to_string(),
                    watch: false,
                    cursor_storage: CursorStorageMode::Memory,
                    name_key: "name".to_string(),
                },
                job: JobSection {
                    name: "adhoc_job".to_string(),
                    op: None,
                    key_prefix: None,
                },
            },
        }
    }

    pub fn sensor_name(mut self, name: &str) -> Self {
        self.config.sensor.name = name.to_string();
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.config.sensor.pattern = pattern.to_string();
        self
    }

    pub fn fingerprint(mut self, mode: FingerprintMode) -> Self {
        self.config.sensor.fingerprint = mode;
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.sensor.interval = interval.to_string();
        self
    }

    pub fn cursor_storage(mut self, mode: CursorStorageMode) -> Self {
        self.config.sensor.cursor_storage = mode;
        self
    }

    pub fn name_key(mut self, key: &str) -> Self {
        self.config.sensor.name_key = key.to_string();
        self
    }

    pub fn job(mut self, name: &str) -> Self {
        self.config.job.name = name.to_string();
        self
    }

    pub fn op(mut self, op: &str) -> Self {
        self.config.job.op = Some(op.to_string());
        self
    }

    pub fn key_prefix(mut self, prefix: &str) -> Self {
        self.config.job.key_prefix = Some(prefix.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
