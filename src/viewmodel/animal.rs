//! Animal list view-model

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Animal, AnimalId, ClientId};
use crate::storage::AppRepository;

use super::{ListState, Store, ViewModel};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalState {
    pub animals: Vec<Animal>,
    pub filtered_animals: Vec<Animal>,
    pub selected_animal: Option<Animal>,
    pub search_query: String,
    pub client_filter: Option<ClientId>,
}

impl AnimalState {
    fn apply_filters(&mut self) {
        let query = self.search_query.trim();
        let owner = self.client_filter;
        self.filtered_animals = self
            .animals
            .iter()
            .filter(|a| owner.map_or(true, |id| a.client_id == Some(id)))
            .filter(|a| query.is_empty() || a.matches_query(query))
            .cloned()
            .collect();
    }

    pub fn animals_for_client(&self, client_id: ClientId) -> Vec<Animal> {
        self.animals
            .iter()
            .filter(|a| a.client_id == Some(client_id))
            .cloned()
            .collect()
    }
}

impl ListState<Animal> for AnimalState {
    fn items_mut(&mut self) -> &mut Vec<Animal> {
        &mut self.animals
    }

    fn refresh(&mut self) {
        self.apply_filters();
    }
}

#[derive(Debug, Clone)]
pub enum AnimalEvent {
    LoadAnimals,
    SelectAnimal(Animal),
    DeselectAnimal,
    SearchAnimals(String),
    AddAnimal(Animal),
    UpdateAnimal(Animal),
    DeleteAnimal(AnimalId),
    FilterByClient(Option<ClientId>),
    ClearClientFilter,
    ClearSearch,
}

pub struct AnimalViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<AnimalState>,
}

impl AnimalViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self {
            repository,
            store: Store::new(AnimalState::default()),
        }
    }

    /// Loaded animals owned by `client_id`, ignoring the active filters
    pub fn animals_for_client(&self, client_id: ClientId) -> Vec<Animal> {
        self.store.read(|s| s.animals_for_client(client_id))
    }

    async fn load_animals(&self) {
        self.store
            .run(async {
                let animals = self.repository.animals().get_all().await?;
                tracing::debug!(count = animals.len(), "loaded animals");
                self.store.update(|s| {
                    s.animals = animals;
                    s.apply_filters();
                });
                Ok(())
            })
            .await;
    }

    fn filter(&self, f: impl FnOnce(&mut AnimalState)) {
        self.store.update(|s| {
            f(s);
            s.apply_filters();
        });
    }
}

#[async_trait]
impl ViewModel for AnimalViewModel {
    type State = AnimalState;
    type Event = AnimalEvent;

    fn store(&self) -> &Store<AnimalState> {
        &self.store
    }

    async fn handle_event(&self, event: AnimalEvent) {
        match event {
            AnimalEvent::LoadAnimals => self.load_animals().await,
            AnimalEvent::SelectAnimal(animal) => {
                self.store.update(|s| s.selected_animal = Some(animal))
            }
            AnimalEvent::DeselectAnimal => self.store.update(|s| s.selected_animal = None),
            AnimalEvent::SearchAnimals(query) => self.filter(|s| s.search_query = query),
            AnimalEvent::AddAnimal(animal) => {
                let insert = self.repository.animals().insert(animal.clone());
                self.store.add_optimistic(animal, insert).await
            }
            AnimalEvent::UpdateAnimal(animal) => {
                let update = self.repository.animals().update(animal.clone());
                self.store.update_optimistic(animal, update).await
            }
            AnimalEvent::DeleteAnimal(id) => {
                self.store.update(|s| {
                    if s.selected_animal.as_ref().map(|a| a.id) == Some(id) {
                        s.selected_animal = None;
                    }
                });
                let delete = self.repository.animals().delete(id);
                self.store.delete_optimistic::<Animal, _>(id, delete).await
            }
            AnimalEvent::FilterByClient(client_id) => self.filter(|s| s.client_filter = client_id),
            AnimalEvent::ClearClientFilter => self.filter(|s| s.client_filter = None),
            AnimalEvent::ClearSearch => self.filter(|s| s.search_query.clear()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;
    use crate::viewmodel::testing::sample_repo;

    async fn loaded() -> AnimalViewModel {
        let vm = AnimalViewModel::new(sample_repo());
        vm.handle_event(AnimalEvent::LoadAnimals).await;
        vm
    }

    #[tokio::test]
    async fn test_client_and_query_facets_combine() {
        let vm = loaded().await;
        let marie = vm.state().animals[0].client_id.unwrap();

        vm.handle_event(AnimalEvent::FilterByClient(Some(marie))).await;
        assert_eq!(vm.state().filtered_animals.len(), 2);

        vm.handle_event(AnimalEvent::SearchAnimals("persan".into()))
            .await;
        let names: Vec<_> = vm
            .state()
            .filtered_animals
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(names, vec!["Misty"]);

        vm.handle_event(AnimalEvent::ClearClientFilter).await;
        vm.handle_event(AnimalEvent::ClearSearch).await;
        assert_eq!(vm.state().filtered_animals.len(), 3);
    }

    #[tokio::test]
    async fn test_species_name_matches() {
        let vm = loaded().await;
        vm.handle_event(AnimalEvent::SearchAnimals("dog".into())).await;
        assert!(vm
            .state()
            .filtered_animals
            .iter()
            .all(|a| a.species == Species::Dog));
        assert_eq!(vm.state().filtered_animals.len(), 2);
    }

    #[tokio::test]
    async fn test_animals_for_client_ignores_filters() {
        let vm = loaded().await;
        let rex = vm.state().animals[2].clone();
        vm.handle_event(AnimalEvent::SearchAnimals("buddy".into())).await;
        let owned = vm.animals_for_client(rex.client_id.unwrap());
        assert_eq!(owned, vec![rex]);
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let vm = loaded().await;
        let owner = vm.state().animals[0].client_id.unwrap();
        let kiwi = Animal::owned_by("Kiwi", Species::Bird, owner);
        vm.handle_event(AnimalEvent::AddAnimal(kiwi)).await;
        assert_eq!(vm.animals_for_client(owner).len(), 3);

        let id = vm.state().animals[3].id;
        vm.handle_event(AnimalEvent::DeleteAnimal(id)).await;
        assert_eq!(vm.state().animals.len(), 3);
    }
}
