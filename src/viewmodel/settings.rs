//! Settings view-model
//!
//! Edits the persisted [`Settings`] and drives backup, restore, export and
//! import of the repository contents.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{BackupFrequency, CleoPaths, Settings};
use crate::error::{CleoError, CleoResult};
use crate::export::{self, ExportFormat};
use crate::storage::{AppRepository, SyncStatus};

use super::{Store, ViewModel};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupStatus {
    pub last_backup_date: Option<DateTime<Utc>>,
    pub last_backup_size: u64,
    pub last_backup_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsState {
    pub settings: Settings,
    pub backup_status: BackupStatus,
    pub sync_status: SyncStatus,
    /// File name of the last export
    pub last_export_file: Option<String>,
    pub last_import_file: Option<PathBuf>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            backup_status: BackupStatus::default(),
            sync_status: SyncStatus::never_synced(),
            last_export_file: None,
            last_import_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SettingsEvent {
    LoadSettings,
    UpdateLanguage(String),
    UpdateCurrency(String),
    UpdateDateFormat(String),
    UpdateTimeFormat(String),
    ToggleNotifications(bool),
    ToggleAutoBackup(bool),
    SetBackupFrequency(BackupFrequency),
    CreateBackup,
    RestoreBackup(PathBuf),
    ExportData { format: ExportFormat, path: PathBuf },
    ImportData(PathBuf),
    CheckSyncStatus,
    ResetSettings,
}

pub struct SettingsViewModel {
    repository: Arc<dyn AppRepository>,
    paths: CleoPaths,
    store: Store<SettingsState>,
}

impl SettingsViewModel {
    pub fn new(repository: Arc<dyn AppRepository>, paths: CleoPaths) -> Self {
        Self {
            repository,
            paths,
            store: Store::new(SettingsState::default()),
        }
    }

    async fn load(&self) {
        self.store
            .run(async {
                let settings = Settings::load_or_create(&self.paths)?;
                self.store.update(|s| s.settings = settings);
                Ok(())
            })
            .await;
    }

    /// Publish the edited settings, then save them; the previous settings come back if saving fails
    async fn edit(&self, f: impl FnOnce(&mut Settings) + Send) {
        let mut previous = None;
        let mut next = None;
        self.store.update(|s| {
            previous = Some(s.settings.clone());
            f(&mut s.settings);
            next = Some(s.settings.clone());
        });
        let (Some(previous), Some(next)) = (previous, next) else {
            return;
        };
        if previous == next {
            return;
        }

        self.store
            .run(async move {
                if let Err(e) = next.save(&self.paths) {
                    tracing::warn!(error = %e, "settings not saved, restoring previous values");
                    self.store.update(|s| s.settings = previous);
                    return Err(e);
                }
                tracing::debug!(file = %self.paths.settings_file().display(), "settings saved");
                Ok(())
            })
            .await;
    }

    async fn create_backup(&self) {
        self.store
            .run(async {
                let snapshot = self.repository.export_data().await?;
                let file = self.paths.backup_dir().join(format!(
                    "backup-{}.json",
                    snapshot.exported_at.format("%Y%m%d-%H%M%S%3f")
                ));
                let size = export::write_snapshot(&snapshot, ExportFormat::Json, &file)?;
                tracing::info!(file = %file.display(), size, "backup created");

                self.store.update(|s| {
                    s.backup_status = BackupStatus {
                        last_backup_date: Some(snapshot.exported_at),
                        last_backup_size: size,
                        last_backup_file: Some(file),
                    }
                });
                Ok(())
            })
            .await;
    }

    async fn import_file(&self, path: &std::path::Path) -> CleoResult<()> {
        let snapshot = export::read_snapshot(path)?;
        let count = snapshot.record_count();
        if !self.repository.import_data(snapshot).await? {
            return Err(CleoError::Import(format!(
                "{} is not a valid snapshot",
                path.display()
            )));
        }
        tracing::info!(file = %path.display(), records = count, "snapshot imported");
        Ok(())
    }

    async fn restore_backup(&self, path: PathBuf) {
        self.store
            .run(async {
                self.import_file(&path).await?;
                let settings = Settings::load_or_create(&self.paths)?;
                self.store.update(|s| s.settings = settings);
                Ok(())
            })
            .await;
    }

    async fn import(&self, path: PathBuf) {
        self.store
            .run(async move {
                self.import_file(&path).await?;
                self.store.update(|s| s.last_import_file = Some(path));
                Ok(())
            })
            .await;
    }

    async fn export(&self, format: ExportFormat, path: PathBuf) {
        self.store
            .run(async move {
                let snapshot = self.repository.export_data().await?;
                export::write_snapshot(&snapshot, format, &path)?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.store.update(|s| s.last_export_file = Some(name));
                Ok(())
            })
            .await;
    }

    async fn check_sync_status(&self) {
        self.store
            .run(async {
                let status = self.repository.sync_status().await?;
                self.store.update(|s| s.sync_status = status);
                Ok(())
            })
            .await;
    }
}

#[async_trait]
impl ViewModel for SettingsViewModel {
    type State = SettingsState;
    type Event = SettingsEvent;

    fn store(&self) -> &Store<SettingsState> {
        &self.store
    }

    async fn handle_event(&self, event: SettingsEvent) {
        match event {
            SettingsEvent::LoadSettings => self.load().await,
            SettingsEvent::UpdateLanguage(code) => self.edit(|s| s.language = code).await,
            SettingsEvent::UpdateCurrency(code) => self.edit(|s| s.currency = code).await,
            SettingsEvent::UpdateDateFormat(format) => self.edit(|s| s.date_format = format).await,
            SettingsEvent::UpdateTimeFormat(format) => self.edit(|s| s.time_format = format).await,
            SettingsEvent::ToggleNotifications(enabled) => {
                self.edit(|s| s.notifications_enabled = enabled).await
            }
            SettingsEvent::ToggleAutoBackup(enabled) => {
                self.edit(|s| s.auto_backup_enabled = enabled).await
            }
            SettingsEvent::SetBackupFrequency(frequency) => {
                self.edit(|s| s.backup_frequency = frequency).await
            }
            SettingsEvent::CreateBackup => self.create_backup().await,
            SettingsEvent::RestoreBackup(path) => self.restore_backup(path).await,
            SettingsEvent::ExportData { format, path } => self.export(format, path).await,
            SettingsEvent::ImportData(path) => self.import(path).await,
            SettingsEvent::CheckSyncStatus => self.check_sync_status().await,
            SettingsEvent::ResetSettings => self.edit(|s| *s = Settings::default()).await,
        }
    }
}
