//! Client listing command

use std::sync::Arc;

use clap::Args;

use crate::display::format_client_list;
use crate::error::CleoResult;
use crate::storage::AppRepository;
use crate::viewmodel::{ClientEvent, ClientViewModel, ViewModel};

use super::published_error;

#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Only clients whose name, email or phone contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

pub async fn handle_clients_command(
    repository: Arc<dyn AppRepository>,
    args: ClientArgs,
) -> CleoResult<()> {
    let animals = repository.animals().get_all().await?;
    let vm = ClientViewModel::new(repository);

    vm.handle_event(ClientEvent::LoadClients).await;
    if let Some(query) = args.search {
        vm.handle_event(ClientEvent::SearchClients(query)).await;
    }
    published_error(&vm)?;

    print!("{}", format_client_list(&vm.state().filtered_clients, &animals));
    Ok(())
}
