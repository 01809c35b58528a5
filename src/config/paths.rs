//! Path management for CleoPattes
//!
//! ## Path Resolution Order
//!
//! 1. `CLEOPATTES_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory from `directories::ProjectDirs`
//!    (`~/.config/cleopattes` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::CleoError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "CLEOPATTES_DATA_DIR";

/// Manages all paths used by CleoPattes
#[derive(Debug, Clone)]
pub struct CleoPaths {
    base_dir: PathBuf,
}

impl CleoPaths {
    /// Resolve the base directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CleoError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("com", "gtreb", "cleopattes")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    CleoError::Config("Could not determine a configuration directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding JSON backups
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Directory exports are written to when no path is given
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Create the base, backup and export directories
    pub fn ensure_directories(&self) -> Result<(), CleoError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CleoError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| CleoError::Io(format!("Failed to create backup directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| CleoError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Whether settings have been saved at least once
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CleoPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(DATA_DIR_ENV, temp_dir.path());
        let paths = CleoPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CleoPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.backup_dir().exists());
        assert!(paths.export_dir().exists());
    }
}
