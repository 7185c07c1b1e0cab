//! Configuration file handling
//!
//! Settings live in a TOML file at `$INFLU_CONFIG` or, by default,
//! `<config home>/influ/config.toml`. A missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PanelError;
use crate::tax::BillingType;

const CONFIG_ENV: &str = "INFLU_CONFIG";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub returns: ReturnsConfig,
    pub collaborations: CollaborationsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; `None` means `~/.influ/data.db`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnsConfig {
    /// Return window used when a purchase is added without `--window`
    pub default_window_days: u32,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        // Statutory window for distance purchases in Poland
        Self {
            default_window_days: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaborationsConfig {
    /// Billing type used when `collabs add` is given none
    pub default_billing_type: BillingType,
}

impl Default for CollaborationsConfig {
    fn default() -> Self {
        Self {
            default_billing_type: BillingType::Umowa50,
        }
    }
}

/// Where the config file is looked up
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dir_spec::config_home()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(config_dir.join("influ").join(CONFIG_FILENAME))
}

impl Config {
    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml(&raw)
            .context(format!("Invalid config file {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| PanelError::ConfigError(e.message().to_string()))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PanelError::ConfigError(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, None);
        assert_eq!(config.returns.default_window_days, 14);
        assert_eq!(config.collaborations.default_billing_type, BillingType::Umowa50);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [returns]
            default_window_days = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.returns.default_window_days, 30);
        assert_eq!(config.collaborations.default_billing_type, BillingType::Umowa50);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            r#"
            [database]
            path = "/tmp/influ.db"

            [collaborations]
            default_billing_type = "useme_20"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/influ.db")));
        assert_eq!(config.collaborations.default_billing_type, BillingType::Useme20);
    }

    #[test]
    fn test_unknown_billing_type_is_a_config_error() {
        let err = Config::from_toml(
            r#"
            [collaborations]
            default_billing_type = "b2b"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PanelError>(),
            Some(PanelError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.returns.default_window_days = 21;
        let raw = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&raw).unwrap(), config);
    }
}
