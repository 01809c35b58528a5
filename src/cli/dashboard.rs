//! Dashboard command

use std::sync::Arc;

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::display::format_dashboard;
use crate::error::CleoResult;
use crate::models::DateRange;
use crate::storage::AppRepository;
use crate::viewmodel::{DashboardEvent, DashboardViewModel, ViewModel};

use super::published_error;

/// Reporting window of the dashboard
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RangeArg {
    Today,
    ThisWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl From<RangeArg> for DateRange {
    fn from(range: RangeArg) -> Self {
        match range {
            RangeArg::Today => DateRange::Today,
            RangeArg::ThisWeek => DateRange::ThisWeek,
            RangeArg::ThisMonth => DateRange::ThisMonth,
            RangeArg::LastMonth => DateRange::LastMonth,
            RangeArg::ThisYear => DateRange::ThisYear,
        }
    }
}

#[derive(Args, Debug)]
pub struct DashboardArgs {
    #[arg(short, long, value_enum, default_value = "this-month")]
    pub range: RangeArg,
}

pub async fn handle_dashboard_command(
    repository: Arc<dyn AppRepository>,
    settings: &Settings,
    args: DashboardArgs,
) -> CleoResult<()> {
    let range = DateRange::from(args.range);
    let vm = DashboardViewModel::new(repository);

    vm.handle_event(DashboardEvent::SetDateRange(range)).await;
    published_error(&vm)?;

    print!(
        "{}",
        format_dashboard(&vm.state().data, range, settings.currency_symbol())
    );
    Ok(())
}
