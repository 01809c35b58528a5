//! Export module for CleoPattes
//!
//! Provides data export in multiple formats:
//! - JSON: machine-readable full snapshot, also used for backups
//! - YAML: human-readable full snapshot
//! - CSV: per-entity listings for spreadsheets

pub mod csv;
pub mod json;
pub mod yaml;

use std::path::Path;

use crate::error::{CleoError, CleoResult};

pub use self::csv::{export_csv, CsvEntity};
pub use json::{import_from_json, write_json, AppDataExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{import_from_yaml, write_yaml};

/// Output format of a snapshot written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    /// A single entity listing
    Csv(CsvEntity),
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv(_) => "csv",
        }
    }
}

/// Write `export` to `path` in `format`, returning the size of the file in bytes
pub fn write_snapshot(export: &AppDataExport, format: ExportFormat, path: &Path) -> CleoResult<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path).map_err(|e| {
        CleoError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;

    match format {
        ExportFormat::Json => write_json(export, &mut file, true)?,
        ExportFormat::Yaml => write_yaml(export, &mut file)?,
        ExportFormat::Csv(entity) => {
            export_csv(export, entity, &mut file)?;
        }
    }

    let size = std::fs::metadata(path)?.len();
    tracing::debug!(path = %path.display(), format = format.extension(), size, "snapshot written");
    Ok(size)
}

/// Read a snapshot file, choosing the parser by extension (`.yaml`/`.yml`, else JSON)
pub fn read_snapshot(path: &Path) -> CleoResult<AppDataExport> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CleoError::Import(format!("Failed to read {}: {}", path.display(), e))
    })?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => import_from_yaml(&content),
        _ => import_from_json(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Client;
    use tempfile::TempDir;

    #[test]
    fn test_read_snapshot_by_extension() {
        let dir = TempDir::new().unwrap();
        let export = AppDataExport::new(vec![Client::new("Marie", "Dupont")], vec![], vec![], vec![], vec![]);

        let json_path = dir.path().join("data.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write_json(&export, &mut file, true).unwrap();

        let yaml_path = dir.path().join("data.yml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        write_yaml(&export, &mut file).unwrap();

        assert_eq!(read_snapshot(&json_path).unwrap(), export);
        assert_eq!(read_snapshot(&yaml_path).unwrap(), export);
        assert!(read_snapshot(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_write_snapshot_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let export = AppDataExport::new(vec![Client::new("Jean", "Martin")], vec![], vec![], vec![], vec![]);

        let path = dir.path().join("out").join("clients.csv");
        let size = write_snapshot(&export, ExportFormat::Csv(CsvEntity::Clients), &path).unwrap();
        assert!(size > 0);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Jean,Martin"));

        let path = dir.path().join("full.yaml");
        write_snapshot(&export, ExportFormat::Yaml, &path).unwrap();
        assert_eq!(read_snapshot(&path).unwrap(), export);
    }
}
