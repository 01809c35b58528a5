//! Global search command

use std::sync::Arc;

use clap::Args;

use crate::display::format_search_results;
use crate::error::CleoResult;
use crate::storage::AppRepository;
use crate::viewmodel::search::SearchFilters;
use crate::viewmodel::{SearchEvent, SearchViewModel, ViewModel};

use super::published_error;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for
    pub query: String,

    /// Leave prestations out of the results
    #[arg(long)]
    pub no_prestations: bool,
}

pub async fn handle_search_command(
    repository: Arc<dyn AppRepository>,
    args: SearchArgs,
) -> CleoResult<()> {
    let vm = SearchViewModel::new(repository);

    if args.no_prestations {
        vm.handle_event(SearchEvent::SetFilters(SearchFilters {
            include_prestations: false,
            ..SearchFilters::default()
        }))
        .await;
    }
    vm.handle_event(SearchEvent::Search(args.query)).await;
    published_error(&vm)?;

    print!("{}", format_search_results(&vm.state().results));
    Ok(())
}
