//! Client list view-model

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Client, ClientId};
use crate::storage::AppRepository;

use super::{ListState, Store, ViewModel};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub clients: Vec<Client>,
    pub filtered_clients: Vec<Client>,
    pub selected_client: Option<Client>,
    pub search_query: String,
}

impl ClientState {
    fn apply_filters(&mut self) {
        let query = self.search_query.trim();
        self.filtered_clients = self
            .clients
            .iter()
            .filter(|c| query.is_empty() || c.matches_query(query))
            .cloned()
            .collect();
    }
}

impl ListState<Client> for ClientState {
    fn items_mut(&mut self) -> &mut Vec<Client> {
        &mut self.clients
    }

    fn refresh(&mut self) {
        self.apply_filters();
    }
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    LoadClients,
    SelectClient(Client),
    DeselectClient,
    SearchClients(String),
    AddClient(Client),
    UpdateClient(Client),
    DeleteClient(ClientId),
    ClearSearch,
}

pub struct ClientViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<ClientState>,
}

impl ClientViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self {
            repository,
            store: Store::new(ClientState::default()),
        }
    }

    async fn load_clients(&self) {
        self.store
            .run(async {
                let clients = self.repository.clients().get_all().await?;
                tracing::debug!(count = clients.len(), "loaded clients");
                self.store.update(|s| {
                    s.clients = clients;
                    s.apply_filters();
                });
                Ok(())
            })
            .await;
    }

    fn set_query(&self, query: String) {
        self.store.update(|s| {
            s.search_query = query;
            s.apply_filters();
        });
    }

    async fn delete_client(&self, id: ClientId) {
        self.store.update(|s| {
            if s.selected_client.as_ref().map(|c| c.id) == Some(id) {
                s.selected_client = None;
            }
        });
        self.store
            .delete_optimistic::<Client, _>(id, self.repository.clients().delete(id))
            .await;
    }
}

#[async_trait]
impl ViewModel for ClientViewModel {
    type State = ClientState;
    type Event = ClientEvent;

    fn store(&self) -> &Store<ClientState> {
        &self.store
    }

    async fn handle_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::LoadClients => self.load_clients().await,
            ClientEvent::SelectClient(client) => {
                self.store.update(|s| s.selected_client = Some(client))
            }
            ClientEvent::DeselectClient => self.store.update(|s| s.selected_client = None),
            ClientEvent::SearchClients(query) => self.set_query(query),
            ClientEvent::AddClient(client) => {
                let insert = self.repository.clients().insert(client.clone());
                self.store.add_optimistic(client, insert).await
            }
            ClientEvent::UpdateClient(client) => {
                let update = self.repository.clients().update(client.clone());
                self.store.update_optimistic(client, update).await
            }
            ClientEvent::DeleteClient(id) => self.delete_client(id).await,
            ClientEvent::ClearSearch => self.set_query(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodel::testing::{sample_repo, GatedRepo};

    async fn loaded() -> (ClientViewModel, Arc<crate::storage::MockAppRepository>) {
        let repo = sample_repo();
        let vm = ClientViewModel::new(repo.clone());
        vm.handle_event(ClientEvent::LoadClients).await;
        (vm, repo)
    }

    #[tokio::test]
    async fn test_load_and_search() {
        let (vm, _) = loaded().await;
        assert_eq!(vm.state().clients.len(), 2);
        assert_eq!(vm.state().filtered_clients.len(), 2);

        vm.handle_event(ClientEvent::SearchClients("MARTIN".into()))
            .await;
        let state = vm.state();
        assert_eq!(state.filtered_clients.len(), 1);
        assert_eq!(state.filtered_clients[0].first_name, "Jean");

        // phone numbers are searchable
        vm.handle_event(ClientEvent::SearchClients("0123".into())).await;
        assert_eq!(vm.state().filtered_clients[0].first_name, "Marie");

        vm.handle_event(ClientEvent::ClearSearch).await;
        assert_eq!(vm.state().filtered_clients.len(), 2);
    }

    #[tokio::test]
    async fn test_filters_are_idempotent() {
        let (vm, _) = loaded().await;
        vm.handle_event(ClientEvent::SearchClients("dupont".into()))
            .await;
        let once = vm.state();
        vm.handle_event(ClientEvent::SearchClients("dupont".into()))
            .await;
        assert_eq!(vm.state(), once);
    }

    #[tokio::test]
    async fn test_add_persists_client() {
        let (vm, repo) = loaded().await;
        vm.handle_event(ClientEvent::AddClient(Client::new("Paul", "Durand")))
            .await;

        let state = vm.state();
        assert_eq!(state.clients.len(), 3);
        let added = &state.clients[2];
        assert!(repo.clients().get_by_id(added.id).await.unwrap().is_some());
        assert!(vm.error_message().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_client_leaves_list() {
        let (vm, _) = loaded().await;
        let before = vm.state().clients;
        vm.handle_event(ClientEvent::UpdateClient(Client::new("Ghost", "Client")))
            .await;
        assert_eq!(vm.state().clients, before);
    }

    #[tokio::test]
    async fn test_delete_clears_selection() {
        let (vm, repo) = loaded().await;
        let marie = vm.state().clients[0].clone();
        vm.handle_event(ClientEvent::SelectClient(marie.clone())).await;
        vm.handle_event(ClientEvent::DeleteClient(marie.id)).await;

        let state = vm.state();
        assert_eq!(state.clients.len(), 1);
        assert!(state.selected_client.is_none());
        assert!(repo.clients().get_by_id(marie.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_only_add_reverts_and_reports() {
        let (vm, repo) = loaded().await;
        repo.set_read_only(true);
        vm.handle_event(ClientEvent::AddClient(Client::new("Paul", "Durand")))
            .await;

        assert_eq!(vm.state().clients.len(), 2);
        assert!(!vm.is_loading());
        let message = vm.error_message().unwrap();
        assert!(message.contains("read-only"));
    }

    #[tokio::test]
    async fn test_add_existing_client_keeps_original() {
        let (vm, repo) = loaded().await;
        let marie = vm.state().clients[0].clone();
        let mut copy = marie.clone();
        copy.first_name = "Copie".into();
        vm.handle_event(ClientEvent::AddClient(copy)).await;

        let state = vm.state();
        assert_eq!(state.clients.len(), 2);
        assert_eq!(state.clients[0], marie);
        assert!(vm.error_message().unwrap().contains("already contains"));
        assert_eq!(repo.clients().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_publishes_before_repository_answers() {
        let (repo, release) = GatedRepo::new();
        let vm = Arc::new(ClientViewModel::new(repo));
        vm.handle_event(ClientEvent::LoadClients).await;
        let before = vm.state().clients;

        let mut renamed = before[0].clone();
        renamed.first_name = "Marie-Anne".into();

        let task = tokio::spawn({
            let vm = vm.clone();
            let renamed = renamed.clone();
            async move { vm.handle_event(ClientEvent::UpdateClient(renamed)).await }
        });

        let mut rx = vm.subscribe();
        rx.wait_for(|s| s.clients[0].first_name == "Marie-Anne")
            .await
            .unwrap();
        assert!(vm.is_loading());

        release.notify_one();
        task.await.unwrap();

        // the gated repository answers false, so the edit is undone
        assert_eq!(vm.state().clients, before);
        assert!(!vm.is_loading());
        assert!(vm.error_message().is_none());
    }

    #[tokio::test]
    async fn test_rejected_delete_restores_collection() {
        let (repo, release) = GatedRepo::new();
        let vm = Arc::new(ClientViewModel::new(repo));
        vm.handle_event(ClientEvent::LoadClients).await;
        let before = vm.state().clients;
        let first = before[0].id;

        let task = tokio::spawn({
            let vm = vm.clone();
            async move { vm.handle_event(ClientEvent::DeleteClient(first)).await }
        });

        let mut rx = vm.subscribe();
        rx.wait_for(|s| s.clients.len() == 1).await.unwrap();
        release.notify_one();
        task.await.unwrap();

        assert_eq!(vm.state().clients, before);
    }
}
