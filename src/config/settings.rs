//! User settings for CleoPattes
//!
//! Display preferences and the backup policy, persisted as pretty JSON in
//! `config.json`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paths::CleoPaths;
use crate::error::CleoError;

/// How often automatic backups run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl BackupFrequency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for BackupFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// User settings for CleoPattes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Interface language code
    #[serde(default = "default_language")]
    pub language: String,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    #[serde(default = "default_true")]
    pub auto_backup_enabled: bool,

    #[serde(default)]
    pub backup_frequency: BackupFrequency,
}

fn default_schema_version() -> u32 {
    1
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_date_format() -> String {
    "dd/MM/yyyy".to_string()
}

fn default_time_format() -> String {
    "HH:mm".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            language: default_language(),
            currency: default_currency(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            notifications_enabled: true,
            auto_backup_enabled: true,
            backup_frequency: BackupFrequency::default(),
        }
    }
}

impl Settings {
    /// Symbol shown next to amounts for the configured currency
    pub fn currency_symbol(&self) -> &str {
        match self.currency.as_str() {
            "EUR" => "€",
            "USD" => "$",
            "GBP" => "£",
            "CHF" => "CHF",
            other => other,
        }
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &CleoPaths) -> Result<Self, CleoError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| CleoError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CleoError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    pub fn save(&self, paths: &CleoPaths) -> Result<(), CleoError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CleoError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CleoError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.language, "fr");
        assert_eq!(settings.currency_symbol(), "€");
        assert_eq!(settings.date_format, "dd/MM/yyyy");
        assert_eq!(settings.backup_frequency, BackupFrequency::Weekly);
        assert!(settings.auto_backup_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CleoPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.language = "en".into();
        settings.backup_frequency = BackupFrequency::Daily;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"currency": "USD"}"#).unwrap();
        assert_eq!(loaded.currency_symbol(), "$");
        assert_eq!(loaded.time_format, "HH:mm");
        assert!(loaded.notifications_enabled);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CleoPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, CleoError::Config(_)));
    }
}
