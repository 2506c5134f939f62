//! Application settings loaded from `spendora.toml`.
//!
//! Every field has a default, so a missing file is not an error. Business
//! thresholds (budget tiers, the large-transaction alert) are constants in
//! [`crate::core`] and are deliberately not configurable.

use crate::config::database::get_database_url;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "spendora.toml";

/// Settings read from the TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database connection URL
    pub database_url: String,
    /// Number of recent expenses shown on the dashboard
    pub recent_expense_limit: usize,
    /// Number of calendar months in the monthly trend
    pub month_window: u32,
    /// Number of categories listed as "top" on the dashboard
    pub top_category_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: get_database_url(),
            recent_expense_limit: 10,
            month_window: 6,
            top_category_count: 3,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or is not valid TOML.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading settings from {}", path_ref.display());
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `path` when it exists, otherwise returns defaults.
pub fn load_settings_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
    if path.as_ref().exists() {
        load_settings(path)
    } else {
        tracing::info!(
            "No settings file at {}, using defaults",
            path.as_ref().display()
        );
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            database_url = "sqlite::memory:"
            recent_expense_limit = 5
            month_window = 12
            top_category_count = 1
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.recent_expense_limit, 5);
        assert_eq!(settings.month_window, 12);
        assert_eq!(settings.top_category_count, 1);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = toml::from_str("month_window = 3").unwrap();
        assert_eq!(settings.month_window, 3);
        assert_eq!(settings.recent_expense_limit, 10);
        assert_eq!(settings.top_category_count, 3);
    }

    #[test]
    fn test_invalid_settings_is_config_error() {
        let dir = std::env::temp_dir().join("spendora_settings_invalid.toml");
        std::fs::write(&dir, "month_window = \"six\"").unwrap();

        let result = load_settings(&dir);
        assert!(matches!(result, Err(Error::Config { message: _ })));

        std::fs::remove_file(&dir).unwrap();
    }

    #[test]
    fn test_missing_settings_falls_back_to_defaults() {
        let settings = load_settings_or_default("does/not/exist/spendora.toml").unwrap();
        assert_eq!(settings.month_window, 6);
    }
}
