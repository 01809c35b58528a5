//! Animal repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CleoResult;
use crate::models::{Animal, AnimalId, Client, ClientId, Species};

use super::table::Tables;

#[async_trait]
pub trait AnimalRepository: Send + Sync {
    async fn get_all(&self) -> CleoResult<Vec<Animal>>;

    async fn get_by_id(&self, id: AnimalId) -> CleoResult<Option<Animal>>;

    async fn get_by_client(&self, client_id: ClientId) -> CleoResult<Vec<Animal>>;

    async fn get_by_species(&self, species: Species) -> CleoResult<Vec<Animal>>;

    async fn search(&self, query: &str) -> CleoResult<Vec<Animal>>;

    async fn insert(&self, animal: Animal) -> CleoResult<AnimalId>;

    async fn update(&self, animal: Animal) -> CleoResult<bool>;

    async fn delete(&self, id: AnimalId) -> CleoResult<bool>;

    async fn deactivate(&self, id: AnimalId) -> CleoResult<bool>;

    async fn count(&self) -> CleoResult<usize>;

    async fn count_by_client(&self, client_id: ClientId) -> CleoResult<usize>;

    /// Every animal paired with its owner, when the owner exists
    async fn with_clients(&self) -> CleoResult<Vec<(Animal, Option<Client>)>>;
}

pub struct InMemoryAnimalRepository {
    tables: Arc<Tables>,
}

impl InMemoryAnimalRepository {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl AnimalRepository for InMemoryAnimalRepository {
    async fn get_all(&self) -> CleoResult<Vec<Animal>> {
        self.tables.animals.all()
    }

    async fn get_by_id(&self, id: AnimalId) -> CleoResult<Option<Animal>> {
        self.tables.animals.get(id)
    }

    async fn get_by_client(&self, client_id: ClientId) -> CleoResult<Vec<Animal>> {
        self.tables
            .animals
            .filter(|a| a.client_id == Some(client_id))
    }

    async fn get_by_species(&self, species: Species) -> CleoResult<Vec<Animal>> {
        self.tables.animals.filter(|a| a.species == species)
    }

    async fn search(&self, query: &str) -> CleoResult<Vec<Animal>> {
        self.tables.animals.filter(|a| a.matches_query(query))
    }

    async fn insert(&self, animal: Animal) -> CleoResult<AnimalId> {
        self.tables.animals.insert(animal)
    }

    async fn update(&self, animal: Animal) -> CleoResult<bool> {
        self.tables.animals.update(animal)
    }

    async fn delete(&self, id: AnimalId) -> CleoResult<bool> {
        self.tables.animals.delete(id)
    }

    async fn deactivate(&self, id: AnimalId) -> CleoResult<bool> {
        self.tables.animals.modify(id, |a| a.is_active = false)
    }

    async fn count(&self) -> CleoResult<usize> {
        self.tables.animals.count()
    }

    async fn count_by_client(&self, client_id: ClientId) -> CleoResult<usize> {
        self.tables
            .animals
            .count_where(|a| a.client_id == Some(client_id))
    }

    async fn with_clients(&self) -> CleoResult<Vec<(Animal, Option<Client>)>> {
        let clients = self.tables.clients.all()?;
        let animals = self.tables.animals.all()?;
        Ok(animals
            .into_iter()
            .map(|animal| {
                let owner = animal
                    .client_id
                    .and_then(|id| clients.iter().find(|c| c.id == id).cloned());
                (animal, owner)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queries_by_client_and_species() {
        let tables = Arc::new(Tables::new(false));
        let repo = InMemoryAnimalRepository::new(tables.clone());
        let owner = Client::new("Marie", "Dupont");
        tables.clients.insert(owner.clone()).unwrap();

        repo.insert(Animal::owned_by("Buddy", Species::Dog, owner.id))
            .await
            .unwrap();
        repo.insert(Animal::owned_by("Misty", Species::Cat, owner.id))
            .await
            .unwrap();
        repo.insert(Animal::new("Stray", Species::Dog)).await.unwrap();

        assert_eq!(repo.get_by_client(owner.id).await.unwrap().len(), 2);
        assert_eq!(repo.count_by_client(owner.id).await.unwrap(), 2);
        assert_eq!(repo.get_by_species(Species::Dog).await.unwrap().len(), 2);
        assert_eq!(repo.search("mis").await.unwrap().len(), 1);

        let pairs = repo.with_clients().await.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].1.as_ref().map(|c| c.id), Some(owner.id));
        assert!(pairs[2].1.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_returns_false() {
        let repo = InMemoryAnimalRepository::new(Arc::new(Tables::new(false)));
        assert!(!repo.update(Animal::new("Rex", Species::Dog)).await.unwrap());
        assert!(!repo.delete(AnimalId::new()).await.unwrap());
    }
}
