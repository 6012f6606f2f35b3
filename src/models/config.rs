use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const ENV_CSV_PATH: &str = "TRADING_CALENDAR_CSV";
pub const ENV_YEAR: &str = "TRADING_CALENDAR_YEAR";
pub const ENV_MONTH: &str = "TRADING_CALENDAR_MONTH";
pub const ENV_HOLIDAYS: &str = "TRADING_CALENDAR_HOLIDAYS";

/// Application configuration. Every field has a default, so an empty JSON
/// object (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Trade log to load at startup.
    pub csv_path: PathBuf,
    /// Calendar year shown on startup.
    pub year: i32,
    /// Month shown on startup (1 = January).
    pub initial_month: u32,
    /// JSON holiday table (`{"2025-01-01": "New Year's Day"}`). Built-in table when unset.
    pub holidays_path: Option<PathBuf>,
    /// Default tracing filter, used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("output.csv"),
            year: 2025,
            initial_month: 1,
            holidays_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file, apply environment overrides and validate.
    /// With no file, defaults plus environment are used.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let mut config = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::InvalidConfig(e.to_string()))
    }

    /// Override fields from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(csv) = lookup(ENV_CSV_PATH) {
            self.csv_path = PathBuf::from(csv);
        }
        if let Some(year) = lookup(ENV_YEAR) {
            self.year = year
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidConfig(format!("{} is not a year: {}", ENV_YEAR, year)))?;
        }
        if let Some(month) = lookup(ENV_MONTH) {
            self.initial_month = month
                .trim()
                .parse()
                .map_err(|_| AppError::InvalidConfig(format!("{} is not a month: {}", ENV_MONTH, month)))?;
        }
        if let Some(holidays) = lookup(ENV_HOLIDAYS) {
            self.holidays_path = Some(PathBuf::from(holidays));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=12).contains(&self.initial_month) {
            return Err(AppError::InvalidConfig(format!(
                "initial_month must be 1-12, got {}",
                self.initial_month
            )));
        }
        if !(1..=9999).contains(&self.year) {
            return Err(AppError::InvalidConfig(format!(
                "year must be 1-9999, got {}",
                self.year
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.csv_path, PathBuf::from("output.csv"));
        assert_eq!(config.year, 2025);
        assert_eq!(config.initial_month, 1);
        assert!(config.holidays_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json_str(r#"{ "initial_month": 3 }"#).unwrap();
        assert_eq!(config.initial_month, 3);
        assert_eq!(config.year, 2025);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_CSV_PATH, "/tmp/trades.csv"),
            (ENV_MONTH, "7"),
            (ENV_HOLIDAYS, "holidays.json"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.csv_path, PathBuf::from("/tmp/trades.csv"));
        assert_eq!(config.initial_month, 7);
        assert_eq!(config.holidays_path, Some(PathBuf::from("holidays.json")));
    }

    #[test]
    fn test_year_override() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| (k == ENV_YEAR).then(|| " 2026 ".to_string()))
            .unwrap();
        assert_eq!(config.year, 2026);
        assert_eq!(config.initial_month, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| (k == ENV_YEAR).then(|| "twenty".to_string()));
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_month_range() {
        let config = AppConfig {
            initial_month: 13,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_year_range() {
        for year in [0, 10000] {
            let config = AppConfig {
                year,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
        }
        let config = AppConfig {
            year: 9999,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.json");
        std::fs::write(&path, r#"{ "csv_path": "march.csv", "initial_month": 3 }"#).unwrap();
        let config = AppConfig::from_json_file(&path).unwrap();
        assert_eq!(config.csv_path, PathBuf::from("march.csv"));
        assert_eq!(config.initial_month, 3);
    }
}
