//! Application settings loading from config.toml
//!
//! The file is optional: every setting has a default, and a missing
//! `config.toml` yields [`AppConfig::default`].

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Dashboard aggregation settings
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

/// Settings for the dashboard summary
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardSettings {
    /// Products with stock at or below this value are reported as low stock
    pub low_stock_threshold: u32,
    /// Number of most recent invoices included in the summary
    pub recent_invoice_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            recent_invoice_limit: 5,
        }
    }
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `path`, falling back to defaults when the file does not exist.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config file at {:?}, using defaults", path);
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_dashboard_settings() {
        let toml_str = r"
            [dashboard]
            low_stock_threshold = 10
        ";

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dashboard.low_stock_threshold, 10);
        assert_eq!(config.dashboard.recent_invoice_limit, 5);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nrecent_invoice_limit = 3").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.dashboard.recent_invoice_limit, 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());

        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
