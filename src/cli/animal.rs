//! Animal listing command

use std::sync::Arc;

use clap::Args;

use crate::display::format_animal_list;
use crate::error::CleoResult;
use crate::models::ClientId;
use crate::storage::AppRepository;
use crate::viewmodel::{AnimalEvent, AnimalViewModel, ViewModel};

use super::published_error;

#[derive(Args, Debug)]
pub struct AnimalArgs {
    /// Only animals owned by this client ID
    #[arg(short, long)]
    pub client: Option<String>,

    /// Only animals whose name, breed or species contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

pub async fn handle_animals_command(
    repository: Arc<dyn AppRepository>,
    args: AnimalArgs,
) -> CleoResult<()> {
    let client_filter = args.client.as_deref().map(ClientId::parse).transpose()?;
    let clients = repository.clients().get_all().await?;
    let vm = AnimalViewModel::new(repository);

    vm.handle_event(AnimalEvent::LoadAnimals).await;
    if client_filter.is_some() {
        vm.handle_event(AnimalEvent::FilterByClient(client_filter)).await;
    }
    if let Some(query) = args.search {
        vm.handle_event(AnimalEvent::SearchAnimals(query)).await;
    }
    published_error(&vm)?;

    print!("{}", format_animal_list(&vm.state().filtered_animals, &clients));
    Ok(())
}
