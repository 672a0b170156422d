//! Grace period configuration.

use std::path::Path;
use std::time::Duration;

use respite_tick::{DEFAULT_TICK_RATE_HZ, TickConfig};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration for grace periods.
///
/// On disk this is a small YAML file:
///
/// ```yaml
/// invincibility-duration: 60
/// ticks-per-second: 20
/// ```
///
/// Missing keys take their defaults; unknown keys are ignored so the
/// file can be shared with other host settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraceConfig {
    /// How long a grace period lasts, in seconds.
    #[serde(rename = "invincibility-duration")]
    pub duration_secs: u64,

    /// Host simulation rate. Grace timers are measured in ticks.
    pub ticks_per_second: u32,
}

impl Default for GraceConfig {
    fn default() -> Self {
        Self {
            duration_secs: 60,
            ticks_per_second: DEFAULT_TICK_RATE_HZ,
        }
    }
}

impl GraceConfig {
    /// Config with the given duration and the default tick rate.
    pub fn with_duration_secs(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            ..Default::default()
        }
    }

    /// Parses and validates a YAML document. An empty document yields
    /// the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let config = if value.is_null() {
            Self::default()
        } else {
            serde_yaml::from_value(value)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Like [`load`](Self::load), but a missing or malformed file falls
    /// back to the defaults with a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    duration_secs = config.duration_secs,
                    "grace config loaded"
                );
                config
            }
            Err(e) => {
                let config = Self::default();
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    duration_secs = config.duration_secs,
                    "falling back to default grace config"
                );
                config
            }
        }
    }

    /// Writes the default config to `path` unless a file already exists.
    ///
    /// Returns `true` if a file was written.
    pub fn save_default(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Ok(false);
        }
        let yaml = serde_yaml::to_string(&Self::default())?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "default grace config written");
        Ok(true)
    }

    /// Checks value ranges that serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::Invalid(
                "invincibility-duration must be at least 1 second".into(),
            ));
        }
        if self.ticks_per_second == 0 || self.ticks_per_second > TickConfig::MAX_TICK_RATE_HZ {
            return Err(ConfigError::Invalid(format!(
                "ticks-per-second must be between 1 and {}",
                TickConfig::MAX_TICK_RATE_HZ
            )));
        }
        Ok(())
    }

    /// Returns `self` if it passes [`validate`](Self::validate), otherwise
    /// the defaults with a warning.
    pub fn validated(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                let config = Self::default();
                tracing::warn!(
                    error = %e,
                    duration_secs = config.duration_secs,
                    ticks_per_second = config.ticks_per_second,
                    "falling back to default grace config"
                );
                config
            }
        }
    }

    /// Grace length on the tick clock.
    pub fn duration_ticks(&self) -> u64 {
        self.duration_secs.saturating_mul(u64::from(self.ticks_per_second))
    }

    /// Grace length in wall-clock time.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Tick scheduler settings matching this config's tick rate.
    pub fn tick_config(&self) -> TickConfig {
        TickConfig::with_rate(self.ticks_per_second)
    }
}
