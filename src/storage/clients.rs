//! Client repository
//!
//! Async contract for client records and its in-memory implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CleoResult;
use crate::models::{Client, ClientId};

use super::table::Tables;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn get_all(&self) -> CleoResult<Vec<Client>>;

    async fn get_by_id(&self, id: ClientId) -> CleoResult<Option<Client>>;

    /// Case-insensitive match over name, email and phone
    async fn search(&self, query: &str) -> CleoResult<Vec<Client>>;

    async fn insert(&self, client: Client) -> CleoResult<ClientId>;

    /// Replace a client; `Ok(false)` when the id is unknown
    async fn update(&self, client: Client) -> CleoResult<bool>;

    /// Remove a client; animals and prestations are left in place
    async fn delete(&self, id: ClientId) -> CleoResult<bool>;

    async fn deactivate(&self, id: ClientId) -> CleoResult<bool>;

    async fn count(&self) -> CleoResult<usize>;

    async fn exists_by_email(&self, email: &str) -> CleoResult<bool>;
}

/// Client repository over the shared in-memory tables
pub struct InMemoryClientRepository {
    tables: Arc<Tables>,
}

impl InMemoryClientRepository {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn get_all(&self) -> CleoResult<Vec<Client>> {
        self.tables.clients.all()
    }

    async fn get_by_id(&self, id: ClientId) -> CleoResult<Option<Client>> {
        self.tables.clients.get(id)
    }

    async fn search(&self, query: &str) -> CleoResult<Vec<Client>> {
        self.tables.clients.filter(|c| c.matches_query(query))
    }

    async fn insert(&self, client: Client) -> CleoResult<ClientId> {
        self.tables.clients.insert(client)
    }

    async fn update(&self, client: Client) -> CleoResult<bool> {
        self.tables.clients.update(client)
    }

    async fn delete(&self, id: ClientId) -> CleoResult<bool> {
        self.tables.clients.delete(id)
    }

    async fn deactivate(&self, id: ClientId) -> CleoResult<bool> {
        self.tables.clients.modify(id, |c| c.is_active = false)
    }

    async fn count(&self) -> CleoResult<usize> {
        self.tables.clients.count()
    }

    async fn exists_by_email(&self, email: &str) -> CleoResult<bool> {
        let email = email.trim().to_lowercase();
        self.tables
            .clients
            .any(|c| !email.is_empty() && c.email.to_lowercase() == email)
    }
}
