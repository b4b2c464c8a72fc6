//! Application configuration

use anyhow::{Context, Result};
use cncsnap_core::Registry;
use cncsnap_types::{CollectorConfig, DeviceConfig, PollConfig, MAX_AXES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Current version of the config format
const CONFIG_VERSION: u32 = 1;

/// Settings the registry cannot check on its own
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("poll.max_axes must be between 1 and 32, got {0}")]
    MaxAxesOutOfRange(usize),

    #[error("poll.interval_ms must be greater than zero")]
    ZeroInterval,

    #[error("no collectors configured")]
    NoCollectors,

    #[error("collector '{collector}' lists parameter {number} more than once")]
    DuplicateParameter { collector: String, number: i32 },
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    /// Collectors in registration order
    #[serde(default = "CollectorConfig::default_list")]
    pub collectors: Vec<CollectorConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "cncsnap", "cncsnap")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check poll settings and the collector list against `registry`
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        if self.poll.max_axes == 0 || self.poll.max_axes > MAX_AXES {
            return Err(ConfigError::MaxAxesOutOfRange(self.poll.max_axes).into());
        }
        if self.poll.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval.into());
        }
        if self.collectors.is_empty() {
            return Err(ConfigError::NoCollectors.into());
        }
        for collector in &self.collectors {
            let mut seen = HashSet::new();
            if let Some(&number) = collector.parameters.iter().find(|&&n| !seen.insert(n)) {
                return Err(ConfigError::DuplicateParameter {
                    collector: collector.id.clone(),
                    number,
                }
                .into());
            }
        }

        registry
            .build(&self.collectors)
            .context("Invalid collector list")?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            device: DeviceConfig::default(),
            poll: PollConfig::default(),
            collectors: CollectorConfig::default_list(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cncsnap_types::ReportPolicy;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cncsnap-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate(cncsnap_sources::builtin_registry()).is_ok());
        assert_eq!(config.collectors.len(), 9);
    }

    #[test]
    fn test_save_and_load_path() {
        let path = temp_path("config.json");
        let mut config = AppConfig::default();
        config.poll.interval_ms = 250;
        config.collectors.push(CollectorConfig::new("parameter").with_parameters(vec![6711]));
        config.collectors[2] =
            CollectorConfig::new("axis_names").with_policy(ReportPolicy::ChangeGated);

        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"poll": {"interval_ms": 500}}"#).unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.poll.protocol_error_limit, 3);
        assert_eq!(config.poll.max_axes, 32);
        assert!(config.device.simulated);
        assert_eq!(config.collectors, CollectorConfig::default_list());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load_from_path(&temp_path("missing.json")).is_err());
    }

    #[test]
    fn test_max_axes_range() {
        let registry = cncsnap_sources::builtin_registry();
        let mut config = AppConfig::default();

        config.poll.max_axes = 0;
        let err = config.validate(registry).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::MaxAxesOutOfRange(0))
        );

        config.poll.max_axes = 33;
        assert!(config.validate(registry).is_err());

        config.poll.max_axes = 32;
        assert!(config.validate(registry).is_ok());
    }

    #[test]
    fn test_unknown_collector_rejected() {
        let mut config = AppConfig::default();
        config.collectors.push(CollectorConfig::new("spindle_load"));
        let err = config.validate(cncsnap_sources::builtin_registry()).unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown collector: spindle_load"));
    }

    #[test]
    fn test_repeated_parameter_rejected() {
        let mut config = AppConfig::default();
        config
            .collectors
            .push(CollectorConfig::new("parameter").with_parameters(vec![6711, 1320, 6711]));
        let err = config.validate(cncsnap_sources::builtin_registry()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::DuplicateParameter {
                collector: "parameter".to_string(),
                number: 6711,
            })
        );
    }

    #[test]
    fn test_derived_before_raw_status_rejected() {
        let mut config = AppConfig::default();
        config.collectors = vec![
            CollectorConfig::new("mode"),
            CollectorConfig::new("raw_status"),
        ];
        assert!(config.validate(cncsnap_sources::builtin_registry()).is_err());
    }
}
