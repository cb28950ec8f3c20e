//! Dashboard configuration loaded from a TOML file in the app directory.
//!
//! Every field has a default matching the published backend, so a missing
//! file or a partial file both yield a usable config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the dashboard configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings that tune the dashboard without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardConfig {
    /// Base URL of the forecasting API, including the `/api` prefix.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Year shown as "next year forecast" on the statistics panel.
    #[serde(default = "default_forecast_target_year")]
    pub forecast_target_year: i32,
    /// Error-rate threshold (in percent) above which table cells are flagged.
    #[serde(default = "default_flag_threshold_pct")]
    pub flag_threshold_pct: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            forecast_target_year: default_forecast_target_year(),
            flag_threshold_pct: default_flag_threshold_pct(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://forecasting-tree-cover-in-the-philippines.onrender.com/api".to_string()
}

fn default_forecast_target_year() -> i32 {
    2025
}

fn default_flag_threshold_pct() -> f64 {
    5.0
}

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be prepared.
    #[error(transparent)]
    Dir(#[from] app_dirs::AppDirError),
    /// The config file exists but could not be read.
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file contains invalid TOML.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load the config from the app directory, or defaults when no file exists.
pub fn load_or_default() -> Result<DashboardConfig, ConfigError> {
    let path = app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME);
    load_from(&path)
}

fn load_from(path: &Path) -> Result<DashboardConfig, ConfigError> {
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_falls_back_per_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "forecast_target_year = 2026\n").unwrap();
        let config = load_from(&path).unwrap();
        assert_eq!(config.forecast_target_year, 2026);
        assert_eq!(config.api_base_url, DashboardConfig::default().api_base_url);
        assert_eq!(config.flag_threshold_pct, 5.0);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = DashboardConfig {
            api_base_url: "http://127.0.0.1:9000/api".into(),
            forecast_target_year: 2030,
            flag_threshold_pct: 7.5,
        };
        let raw = toml::to_string(&config).unwrap();
        let parsed: DashboardConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "forecast_target_year = [nope").unwrap();
        assert!(matches!(
            load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
