//! YAML snapshot export
//!
//! Same content as the JSON snapshot, for a human-readable backup.

use std::io::Write;

use crate::error::{CleoError, CleoResult};
use crate::export::json::AppDataExport;

/// Write a snapshot as YAML, preceded by a comment header
pub fn write_yaml<W: Write>(export: &AppDataExport, writer: &mut W) -> CleoResult<()> {
    let header = format!(
        "# CleoPattes data export\n# Generated: {}\n# App version: {}\n\n",
        export.exported_at.to_rfc3339(),
        export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| CleoError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| CleoError::Export(e.to_string()))
}

/// Parse and validate a YAML snapshot
pub fn import_from_yaml(yaml_str: &str) -> CleoResult<AppDataExport> {
    let export: AppDataExport =
        serde_yaml::from_str(yaml_str).map_err(|e| CleoError::Import(e.to_string()))?;
    export.validate().map_err(CleoError::Import)?;
    Ok(export)
}
