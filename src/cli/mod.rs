//! CLI command handlers
//!
//! Each handler drives a view-model through its events, then prints the
//! resulting state with the `display` formatters.

pub mod animal;
pub mod client;
pub mod dashboard;
pub mod export;
pub mod planning;
pub mod search;
pub mod service;

pub use animal::{handle_animals_command, AnimalArgs};
pub use client::{handle_clients_command, ClientArgs};
pub use dashboard::{handle_dashboard_command, DashboardArgs, RangeArg};
pub use export::{handle_backup_command, handle_export_command, ExportArgs, FormatArg};
pub use planning::{handle_planning_command, PlanningArgs, ViewArg};
pub use search::{handle_search_command, SearchArgs};
pub use service::{handle_services_command, ServiceArgs};

use crate::error::{CleoError, CleoResult};
use crate::viewmodel::ViewModel;

/// Turn the error a view-model published into a command failure
pub(crate) fn published_error<V: ViewModel>(vm: &V) -> CleoResult<()> {
    match vm.error_message() {
        Some(message) => Err(CleoError::Task(message)),
        None => Ok(()),
    }
}
