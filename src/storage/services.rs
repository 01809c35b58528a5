//! Service repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CleoResult;
use crate::models::{Money, Service, ServiceId};

use super::table::Tables;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn get_all(&self) -> CleoResult<Vec<Service>>;

    async fn get_by_id(&self, id: ServiceId) -> CleoResult<Option<Service>>;

    /// Services priced within `[min, max]`
    async fn get_by_price_range(&self, min: Money, max: Money) -> CleoResult<Vec<Service>>;

    /// Services lasting within `[min_minutes, max_minutes]`
    async fn get_by_duration_range(
        &self,
        min_minutes: u32,
        max_minutes: u32,
    ) -> CleoResult<Vec<Service>>;

    async fn search(&self, query: &str) -> CleoResult<Vec<Service>>;

    async fn insert(&self, service: Service) -> CleoResult<ServiceId>;

    async fn update(&self, service: Service) -> CleoResult<bool>;

    async fn delete(&self, id: ServiceId) -> CleoResult<bool>;

    async fn deactivate(&self, id: ServiceId) -> CleoResult<bool>;

    async fn count(&self) -> CleoResult<usize>;

    /// Mean price, zero when there are no services
    async fn average_price(&self) -> CleoResult<Money>;

    /// Services ordered by number of prestations booked, most booked first
    async fn most_popular(&self, limit: usize) -> CleoResult<Vec<Service>>;
}

pub struct InMemoryServiceRepository {
    tables: Arc<Tables>,
}

impl InMemoryServiceRepository {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl ServiceRepository for InMemoryServiceRepository {
    async fn get_all(&self) -> CleoResult<Vec<Service>> {
        self.tables.services.all()
    }

    async fn get_by_id(&self, id: ServiceId) -> CleoResult<Option<Service>> {
        self.tables.services.get(id)
    }

    async fn get_by_price_range(&self, min: Money, max: Money) -> CleoResult<Vec<Service>> {
        self.tables
            .services
            .filter(|s| s.price >= min && s.price <= max)
    }

    async fn get_by_duration_range(
        &self,
        min_minutes: u32,
        max_minutes: u32,
    ) -> CleoResult<Vec<Service>> {
        self.tables
            .services
            .filter(|s| (min_minutes..=max_minutes).contains(&s.duration_minutes))
    }

    async fn search(&self, query: &str) -> CleoResult<Vec<Service>> {
        self.tables.services.filter(|s| s.matches_query(query))
    }

    async fn insert(&self, service: Service) -> CleoResult<ServiceId> {
        self.tables.services.insert(service)
    }

    async fn update(&self, service: Service) -> CleoResult<bool> {
        self.tables.services.update(service)
    }

    async fn delete(&self, id: ServiceId) -> CleoResult<bool> {
        self.tables.services.delete(id)
    }

    async fn deactivate(&self, id: ServiceId) -> CleoResult<bool> {
        self.tables.services.modify(id, |s| s.is_active = false)
    }

    async fn count(&self) -> CleoResult<usize> {
        self.tables.services.count()
    }

    async fn average_price(&self) -> CleoResult<Money> {
        let services = self.tables.services.all()?;
        let total: Money = services.iter().map(|s| s.price).sum();
        Ok(Money::average(total, services.len()))
    }

    async fn most_popular(&self, limit: usize) -> CleoResult<Vec<Service>> {
        let mut bookings: HashMap<ServiceId, usize> = HashMap::new();
        for prestation in self.tables.prestations.all()? {
            *bookings.entry(prestation.service_id).or_default() += 1;
        }

        let mut services = self.tables.services.all()?;
        // stable sort keeps insertion order among ties
        services.sort_by_key(|s| std::cmp::Reverse(bookings.get(&s.id).copied().unwrap_or(0)));
        services.truncate(limit);
        Ok(services)
    }
}
