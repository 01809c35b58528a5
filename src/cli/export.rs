//! Export and backup commands

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::config::CleoPaths;
use crate::error::{CleoError, CleoResult};
use crate::export::{CsvEntity, ExportFormat};
use crate::storage::AppRepository;
use crate::viewmodel::{SettingsEvent, SettingsViewModel, ViewModel};

use super::published_error;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Full snapshot, pretty-printed
    Json,
    /// Full snapshot, human-readable
    Yaml,
    /// One entity listing, chosen with --entity
    Csv,
}

/// Entity listed by a CSV export
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Clients,
    Animals,
    Services,
    Prestations,
    TimeSlots,
}

impl From<EntityArg> for CsvEntity {
    fn from(entity: EntityArg) -> Self {
        match entity {
            EntityArg::Clients => CsvEntity::Clients,
            EntityArg::Animals => CsvEntity::Animals,
            EntityArg::Services => CsvEntity::Services,
            EntityArg::Prestations => CsvEntity::Prestations,
            EntityArg::TimeSlots => CsvEntity::TimeSlots,
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: FormatArg,

    /// Output file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Entity listed in a CSV export
    #[arg(short, long, value_enum, default_value = "prestations")]
    pub entity: EntityArg,
}

pub async fn handle_export_command(
    repository: Arc<dyn AppRepository>,
    paths: CleoPaths,
    args: ExportArgs,
) -> CleoResult<()> {
    let format = match args.format {
        FormatArg::Json => ExportFormat::Json,
        FormatArg::Yaml => ExportFormat::Yaml,
        FormatArg::Csv => ExportFormat::Csv(args.entity.into()),
    };
    let vm = SettingsViewModel::new(repository, paths);

    vm.handle_event(SettingsEvent::ExportData {
        format,
        path: args.output.clone(),
    })
    .await;
    published_error(&vm)?;

    let name = vm
        .state()
        .last_export_file
        .ok_or_else(|| CleoError::Export("No file was written".into()))?;
    println!("Exported {} to {}", name, args.output.display());
    Ok(())
}

/// Write a JSON backup into the backup directory
pub async fn handle_backup_command(
    repository: Arc<dyn AppRepository>,
    paths: CleoPaths,
) -> CleoResult<()> {
    let vm = SettingsViewModel::new(repository, paths);

    vm.handle_event(SettingsEvent::CreateBackup).await;
    published_error(&vm)?;

    let status = vm.state().backup_status;
    if let Some(file) = status.last_backup_file {
        println!("Backup created: {}", file.display());
        println!("  Size: {} bytes", status.last_backup_size);
    }
    Ok(())
}
