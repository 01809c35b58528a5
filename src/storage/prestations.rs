//! Prestation repository
//!
//! Queries by reference, status and date, revenue aggregation over completed
//! prestations, and status transitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::CleoResult;
use crate::models::{
    AnimalId, ClientId, Money, Prestation, PrestationId, PrestationStatus, PrestationWithDetails,
    ServiceId,
};

use super::table::Tables;

#[async_trait]
pub trait PrestationRepository: Send + Sync {
    async fn get_all(&self) -> CleoResult<Vec<Prestation>>;

    async fn get_by_id(&self, id: PrestationId) -> CleoResult<Option<Prestation>>;

    async fn get_by_status(&self, status: PrestationStatus) -> CleoResult<Vec<Prestation>>;

    async fn get_by_client(&self, client_id: ClientId) -> CleoResult<Vec<Prestation>>;

    async fn get_by_animal(&self, animal_id: AnimalId) -> CleoResult<Vec<Prestation>>;

    async fn get_by_service(&self, service_id: ServiceId) -> CleoResult<Vec<Prestation>>;

    /// Prestations starting within `[start, end]`
    async fn get_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<Prestation>>;

    /// Prestations starting on the UTC day `today`
    async fn get_today(&self, today: NaiveDate) -> CleoResult<Vec<Prestation>>;

    /// Prestations starting after `now`, soonest first
    async fn get_upcoming(&self, now: DateTime<Utc>) -> CleoResult<Vec<Prestation>>;

    /// Prestations that started before `now`, latest first
    async fn get_past(&self, now: DateTime<Utc>) -> CleoResult<Vec<Prestation>>;

    async fn search(&self, query: &str) -> CleoResult<Vec<Prestation>>;

    async fn insert(&self, prestation: Prestation) -> CleoResult<PrestationId>;

    async fn update(&self, prestation: Prestation) -> CleoResult<bool>;

    async fn delete(&self, id: PrestationId) -> CleoResult<bool>;

    async fn update_status(&self, id: PrestationId, status: PrestationStatus) -> CleoResult<bool>;

    async fn start(&self, id: PrestationId) -> CleoResult<bool> {
        self.update_status(id, PrestationStatus::InProgress).await
    }

    async fn complete(&self, id: PrestationId) -> CleoResult<bool> {
        self.update_status(id, PrestationStatus::Completed).await
    }

    async fn cancel(&self, id: PrestationId) -> CleoResult<bool> {
        self.update_status(id, PrestationStatus::Cancelled).await
    }

    async fn count(&self) -> CleoResult<usize>;

    async fn count_by_status(&self, status: PrestationStatus) -> CleoResult<usize>;

    /// Revenue of completed prestations starting within `[start, end]`
    async fn total_revenue(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> CleoResult<Money>;

    /// Completed revenue per month (1-12) of `year`; months without revenue are absent
    async fn monthly_revenue(&self, year: i32) -> CleoResult<BTreeMap<u32, Money>>;

    async fn with_details(&self) -> CleoResult<Vec<PrestationWithDetails>>;
}

/// Resolve the client, animal and service of a prestation
pub(crate) fn resolve_details(
    tables: &Tables,
    prestation: Prestation,
) -> CleoResult<PrestationWithDetails> {
    Ok(PrestationWithDetails {
        client: tables.clients.get(prestation.client_id)?,
        animal: tables.animals.get(prestation.animal_id)?,
        service: tables.services.get(prestation.service_id)?,
        prestation,
    })
}

pub struct InMemoryPrestationRepository {
    tables: Arc<Tables>,
}

impl InMemoryPrestationRepository {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl PrestationRepository for InMemoryPrestationRepository {
    async fn get_all(&self) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.all()
    }

    async fn get_by_id(&self, id: PrestationId) -> CleoResult<Option<Prestation>> {
        self.tables.prestations.get(id)
    }

    async fn get_by_status(&self, status: PrestationStatus) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.status == status)
    }

    async fn get_by_client(&self, client_id: ClientId) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.client_id == client_id)
    }

    async fn get_by_animal(&self, animal_id: AnimalId) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.animal_id == animal_id)
    }

    async fn get_by_service(&self, service_id: ServiceId) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.service_id == service_id)
    }

    async fn get_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<Prestation>> {
        self.tables
            .prestations
            .filter(|p| p.start_date >= start && p.start_date <= end)
    }

    async fn get_today(&self, today: NaiveDate) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.start_day() == today)
    }

    async fn get_upcoming(&self, now: DateTime<Utc>) -> CleoResult<Vec<Prestation>> {
        let mut upcoming = self.tables.prestations.filter(|p| p.start_date > now)?;
        upcoming.sort_by_key(|p| p.start_date);
        Ok(upcoming)
    }

    async fn get_past(&self, now: DateTime<Utc>) -> CleoResult<Vec<Prestation>> {
        let mut past = self.tables.prestations.filter(|p| p.start_date < now)?;
        past.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(past)
    }

    async fn search(&self, query: &str) -> CleoResult<Vec<Prestation>> {
        self.tables.prestations.filter(|p| p.matches_query(query))
    }

    async fn insert(&self, prestation: Prestation) -> CleoResult<PrestationId> {
        self.tables.prestations.insert(prestation)
    }

    async fn update(&self, prestation: Prestation) -> CleoResult<bool> {
        self.tables.prestations.update(prestation)
    }

    async fn delete(&self, id: PrestationId) -> CleoResult<bool> {
        self.tables.prestations.delete(id)
    }

    async fn update_status(&self, id: PrestationId, status: PrestationStatus) -> CleoResult<bool> {
        self.tables.prestations.modify(id, |p| p.status = status)
    }

    async fn count(&self) -> CleoResult<usize> {
        self.tables.prestations.count()
    }

    async fn count_by_status(&self, status: PrestationStatus) -> CleoResult<usize> {
        self.tables.prestations.count_where(|p| p.status == status)
    }

    async fn total_revenue(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> CleoResult<Money> {
        let completed = self.tables.prestations.filter(|p| {
            p.is_completed() && p.start_date >= start && p.start_date <= end
        })?;
        Ok(completed.iter().map(|p| p.price).sum())
    }

    async fn monthly_revenue(&self, year: i32) -> CleoResult<BTreeMap<u32, Money>> {
        let mut by_month = BTreeMap::new();
        for p in self
            .tables
            .prestations
            .filter(|p| p.is_completed() && p.start_day().year() == year)?
        {
            *by_month.entry(p.start_day().month()).or_insert(Money::zero()) += p.price;
        }
        Ok(by_month)
    }

    async fn with_details(&self) -> CleoResult<Vec<PrestationWithDetails>> {
        self.tables
            .prestations
            .all()?
            .into_iter()
            .map(|p| resolve_details(&self.tables, p))
            .collect()
    }
}
