//! JSON snapshot export
//!
//! The snapshot carries every entity list plus a schema version checked on
//! import.

use std::collections::HashSet;
use std::hash::Hash;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CleoError, CleoResult};
use crate::models::{timestamp, Animal, Client, Prestation, Service, TimeSlot};

/// Current snapshot schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full application data snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppDataExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,

    /// Application version that created the snapshot
    pub app_version: String,

    #[serde(default)]
    pub clients: Vec<Client>,

    #[serde(default)]
    pub animals: Vec<Animal>,

    #[serde(default)]
    pub services: Vec<Service>,

    #[serde(default)]
    pub prestations: Vec<Prestation>,

    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl AppDataExport {
    pub fn new(
        clients: Vec<Client>,
        animals: Vec<Animal>,
        services: Vec<Service>,
        prestations: Vec<Prestation>,
        time_slots: Vec<TimeSlot>,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: timestamp::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            clients,
            animals,
            services,
            prestations,
            time_slots,
        }
    }

    pub fn record_count(&self) -> usize {
        self.clients.len()
            + self.animals.len()
            + self.services.len()
            + self.prestations.len()
            + self.time_slots.len()
    }

    /// Check the schema version and that ids are unique per entity type
    ///
    /// References between entities are not checked.
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        check_unique("client", self.clients.iter().map(|c| c.id))?;
        check_unique("animal", self.animals.iter().map(|a| a.id))?;
        check_unique("service", self.services.iter().map(|s| s.id))?;
        check_unique("prestation", self.prestations.iter().map(|p| p.id))?;
        check_unique("time slot", self.time_slots.iter().map(|s| s.id))?;
        Ok(())
    }
}

fn check_unique<I>(kind: &str, ids: impl Iterator<Item = I>) -> Result<(), String>
where
    I: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for id in ids {
        if let Some(dup) = seen.replace(id) {
            return Err(format!("Duplicate {} id {}", kind, dup));
        }
    }
    Ok(())
}

/// Write a snapshot as JSON
pub fn write_json<W: Write>(export: &AppDataExport, writer: &mut W, pretty: bool) -> CleoResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, export)
    } else {
        serde_json::to_writer(writer, export)
    }
    .map_err(|e| CleoError::Export(e.to_string()))
}

/// Parse and validate a JSON snapshot
pub fn import_from_json(json_str: &str) -> CleoResult<AppDataExport> {
    let export: AppDataExport =
        serde_json::from_str(json_str).map_err(|e| CleoError::Import(e.to_string()))?;
    export.validate().map_err(CleoError::Import)?;
    Ok(export)
}
