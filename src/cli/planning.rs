//! Planning command

use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::display::format_planning;
use crate::error::CleoResult;
use crate::models::CalendarView;
use crate::storage::AppRepository;
use crate::viewmodel::{PlanningEvent, PlanningViewModel, ViewModel};

use super::published_error;

/// Calendar window size
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Day,
    Week,
    /// 30 days from the date
    Month,
}

impl From<ViewArg> for CalendarView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Day => CalendarView::Day,
            ViewArg::Week => CalendarView::Week,
            ViewArg::Month => CalendarView::Month,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlanningArgs {
    /// First day of the window (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_enum, default_value = "day")]
    pub view: ViewArg,
}

pub async fn handle_planning_command(
    repository: Arc<dyn AppRepository>,
    args: PlanningArgs,
) -> CleoResult<()> {
    let vm = match args.date {
        Some(date) => PlanningViewModel::on_date(repository, date),
        None => PlanningViewModel::new(repository),
    };

    vm.load_initial_data().await;
    let view = CalendarView::from(args.view);
    if view != vm.state().calendar_view {
        vm.handle_event(PlanningEvent::SetCalendarView(view)).await;
    }
    published_error(&vm)?;

    print!("{}", format_planning(&vm.state()));
    Ok(())
}
