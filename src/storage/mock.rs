//! In-memory application repository
//!
//! Owns the shared tables and the per-entity in-memory repositories, and
//! answers the cross-entity queries directly from the tables.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::error::CleoResult;
use crate::export::AppDataExport;
use crate::models::{
    Animal, AnimalId, Client, ClientId, Money, Prestation, PrestationId, PrestationWithDetails,
    ServiceId, TimeSlot, TimeSlotId, TimeSlotWithDetails,
};

use super::animals::{AnimalRepository, InMemoryAnimalRepository};
use super::app::{
    AppRepository, ClientWithAnimals, DashboardStats, GlobalSearchResults, NewPrestation,
    NewTimeSlot, RevenuePeriod, RevenueStats, ServiceRevenue, SyncStatus,
};
use super::clients::{ClientRepository, InMemoryClientRepository};
use super::prestations::{self, InMemoryPrestationRepository, PrestationRepository};
use super::seed::{self, SeedConfig};
use super::services::{InMemoryServiceRepository, ServiceRepository};
use super::table::Tables;
use super::time_slots::{self, InMemoryTimeSlotRepository, TimeSlotRepository};

pub struct MockAppRepository {
    tables: Arc<Tables>,
    clients: InMemoryClientRepository,
    animals: InMemoryAnimalRepository,
    services: InMemoryServiceRepository,
    prestations: InMemoryPrestationRepository,
    time_slots: InMemoryTimeSlotRepository,
}

impl MockAppRepository {
    /// Create a repository loaded according to `config`
    pub fn new(config: &SeedConfig) -> CleoResult<Self> {
        let repo = Self::empty();
        seed::seed(&repo.tables, config)?;
        Ok(repo)
    }

    /// Create a repository with no records
    pub fn empty() -> Self {
        let tables = Arc::new(Tables::new(false));
        Self {
            clients: InMemoryClientRepository::new(tables.clone()),
            animals: InMemoryAnimalRepository::new(tables.clone()),
            services: InMemoryServiceRepository::new(tables.clone()),
            prestations: InMemoryPrestationRepository::new(tables.clone()),
            time_slots: InMemoryTimeSlotRepository::new(tables.clone()),
            tables,
        }
    }

    /// Make every subsequent write fail with a read-only error
    pub fn set_read_only(&self, read_only: bool) {
        self.tables.read_only.set(read_only);
    }

    pub fn is_read_only(&self) -> bool {
        self.tables.read_only.is_on()
    }
}

#[async_trait]
impl AppRepository for MockAppRepository {
    fn clients(&self) -> &dyn ClientRepository {
        &self.clients
    }

    fn animals(&self) -> &dyn AnimalRepository {
        &self.animals
    }

    fn services(&self) -> &dyn ServiceRepository {
        &self.services
    }

    fn prestations(&self) -> &dyn PrestationRepository {
        &self.prestations
    }

    fn time_slots(&self) -> &dyn TimeSlotRepository {
        &self.time_slots
    }

    async fn dashboard_stats(&self, today: NaiveDate) -> CleoResult<DashboardStats> {
        let prestations = self.tables.prestations.all()?;
        let first_of_month = today.with_day(1).unwrap_or(today);

        Ok(DashboardStats {
            total_clients: self.tables.clients.count()?,
            total_animals: self.tables.animals.count()?,
            total_services: self.tables.services.count()?,
            total_prestations: prestations.len(),
            today_prestations: prestations.iter().filter(|p| p.start_day() == today).count(),
            upcoming_prestations: prestations.iter().filter(|p| p.start_day() > today).count(),
            monthly_revenue: prestations
                .iter()
                .filter(|p| {
                    p.is_completed() && p.start_day() >= first_of_month && p.start_day() <= today
                })
                .map(|p| p.price)
                .sum(),
            active_clients: self.tables.clients.count_where(|c| c.is_active)?,
        })
    }

    async fn client_with_animals(
        &self,
        client_id: ClientId,
    ) -> CleoResult<Option<ClientWithAnimals>> {
        let Some(client) = self.tables.clients.get(client_id)? else {
            return Ok(None);
        };
        let animals = self
            .tables
            .animals
            .filter(|a| a.client_id == Some(client_id))?;
        Ok(Some(ClientWithAnimals { client, animals }))
    }

    async fn create_client_with_animal(
        &self,
        client: Client,
        mut animal: Animal,
    ) -> CleoResult<(ClientId, AnimalId)> {
        animal.client_id = Some(client.id);
        let client_id = self.tables.clients.insert(client)?;
        match self.tables.animals.insert(animal) {
            Ok(animal_id) => Ok((client_id, animal_id)),
            Err(e) => {
                self.tables.clients.delete(client_id)?;
                Err(e)
            }
        }
    }

    async fn prestation_details(
        &self,
        prestation_id: PrestationId,
    ) -> CleoResult<Option<PrestationWithDetails>> {
        self.tables
            .prestations
            .get(prestation_id)?
            .map(|p| prestations::resolve_details(&self.tables, p))
            .transpose()
    }

    async fn create_prestation(&self, request: NewPrestation) -> CleoResult<PrestationId> {
        let mut prestation = Prestation::new(
            request.client_id,
            request.animal_id,
            request.service_id,
            request.start_date,
            request.end_date,
            request.price,
        );
        prestation.notes = request.notes;
        self.tables.prestations.insert(prestation)
    }

    async fn time_slot_details(
        &self,
        time_slot_id: TimeSlotId,
    ) -> CleoResult<Option<TimeSlotWithDetails>> {
        self.tables
            .time_slots
            .get(time_slot_id)?
            .map(|s| time_slots::resolve_details(&self.tables, s))
            .transpose()
    }

    async fn create_time_slot(&self, request: NewTimeSlot) -> CleoResult<TimeSlotId> {
        let mut time_slot = TimeSlot::new(
            request.client_id,
            request.animal_id,
            request.service_id,
            request.start_date_time,
            request.end_date_time,
        );
        time_slot.notes = request.notes;
        self.tables.time_slots.insert(time_slot)
    }

    async fn revenue_stats(
        &self,
        period: RevenuePeriod,
        today: NaiveDate,
    ) -> CleoResult<RevenueStats> {
        let (first, last) = period.bounds(today);
        let completed = self.tables.prestations.filter(|p| {
            p.is_completed() && p.start_day() >= first && p.start_day() <= last
        })?;

        let total_revenue: Money = completed.iter().map(|p| p.price).sum();

        let mut per_service: HashMap<ServiceId, (Money, usize)> = HashMap::new();
        let mut monthly_breakdown = std::collections::BTreeMap::new();
        for p in &completed {
            let entry = per_service.entry(p.service_id).or_insert((Money::zero(), 0));
            entry.0 += p.price;
            entry.1 += 1;
            *monthly_breakdown
                .entry(p.start_day().month())
                .or_insert(Money::zero()) += p.price;
        }

        let mut top_services: Vec<ServiceRevenue> = self
            .tables
            .services
            .all()?
            .into_iter()
            .filter_map(|service| {
                per_service.get(&service.id).map(|&(revenue, count)| ServiceRevenue {
                    service,
                    revenue,
                    count,
                })
            })
            .collect();
        top_services.sort_by(|a, b| b.revenue.cmp(&a.revenue));
        top_services.truncate(5);

        Ok(RevenueStats {
            total_revenue,
            average_revenue: Money::average(total_revenue, completed.len()),
            prestation_count: completed.len(),
            top_services,
            monthly_breakdown,
        })
    }

    async fn global_search(&self, query: &str) -> CleoResult<GlobalSearchResults> {
        let q = query.trim();
        if q.is_empty() {
            return Ok(GlobalSearchResults::default());
        }
        Ok(GlobalSearchResults {
            clients: self.clients.search(q).await?,
            animals: self.animals.search(q).await?,
            services: self.services.search(q).await?,
            prestations: self.prestations.search(q).await?,
        })
    }

    async fn export_data(&self) -> CleoResult<AppDataExport> {
        Ok(AppDataExport::new(
            self.tables.clients.all()?,
            self.tables.animals.all()?,
            self.tables.services.all()?,
            self.tables.prestations.all()?,
            self.tables.time_slots.all()?,
        ))
    }

    async fn import_data(&self, data: AppDataExport) -> CleoResult<bool> {
        if let Err(reason) = data.validate() {
            tracing::warn!(%reason, "rejected snapshot import");
            return Ok(false);
        }
        let count = data.record_count();
        self.tables.clients.replace_all(data.clients)?;
        self.tables.animals.replace_all(data.animals)?;
        self.tables.services.replace_all(data.services)?;
        self.tables.prestations.replace_all(data.prestations)?;
        self.tables.time_slots.replace_all(data.time_slots)?;
        tracing::debug!(records = count, "imported snapshot");
        Ok(true)
    }

    async fn sync_status(&self) -> CleoResult<SyncStatus> {
        Ok(SyncStatus::never_synced())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleoError;
    use crate::models::{timestamp, PrestationStatus, Species};
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn seeded() -> MockAppRepository {
        MockAppRepository::new(&SeedConfig::sample_on(today())).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_counts() {
        let repo = seeded();
        let stats = repo.dashboard_stats(today()).await.unwrap();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_animals, 3);
        assert_eq!(stats.total_services, 3);
        assert_eq!(stats.total_prestations, 3);
        assert_eq!(stats.upcoming_prestations, 1);
        assert_eq!(stats.active_clients, 2);
        // Promenade 15 + Toilettage 45, both completed earlier this month
        assert_eq!(stats.monthly_revenue, Money::from_euros(60));
    }

    #[tokio::test]
    async fn test_client_with_animals() {
        let repo = seeded();
        let marie = repo.clients().search("Marie").await.unwrap().remove(0);
        let with = repo.client_with_animals(marie.id).await.unwrap().unwrap();
        assert_eq!(with.animals.len(), 2);
        assert!(repo
            .client_with_animals(ClientId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_client_with_animal_links_owner() {
        let repo = MockAppRepository::empty();
        let (client_id, animal_id) = repo
            .create_client_with_animal(
                Client::new("Luc", "Bernard"),
                Animal::new("Plume", Species::Bird),
            )
            .await
            .unwrap();
        let animal = repo.animals().get_by_id(animal_id).await.unwrap().unwrap();
        assert_eq!(animal.client_id, Some(client_id));
    }

    #[tokio::test]
    async fn test_create_client_with_existing_animal_adds_nothing() {
        let repo = MockAppRepository::empty();
        let animal = Animal::new("Plume", Species::Bird);
        repo.animals().insert(animal.clone()).await.unwrap();

        let err = repo
            .create_client_with_animal(Client::new("Luc", "Bernard"), animal)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.clients().count().await.unwrap(), 0);
        assert_eq!(repo.animals().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_repeated_insert_keeps_snapshot_importable() {
        let repo = MockAppRepository::empty();
        let client = Client::new("Marie", "Dupont");
        repo.clients().insert(client.clone()).await.unwrap();
        assert!(repo.clients().insert(client).await.unwrap_err().is_validation());
        assert_eq!(repo.clients().count().await.unwrap(), 1);

        let target = MockAppRepository::empty();
        assert!(target.import_data(repo.export_data().await.unwrap()).await.unwrap());
        assert_eq!(target.clients().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_and_resolve_time_slot() {
        let repo = seeded();
        let client = repo.clients().get_all().await.unwrap().remove(0);
        let start = timestamp::at(today(), 11, 0);
        let id = repo
            .create_time_slot(NewTimeSlot {
                client_id: client.id,
                animal_id: AnimalId::new(),
                service_id: ServiceId::new(),
                start_date_time: start,
                end_date_time: start + Duration::minutes(30),
                notes: "Visite".into(),
            })
            .await
            .unwrap();

        let details = repo.time_slot_details(id).await.unwrap().unwrap();
        assert_eq!(details.client.map(|c| c.id), Some(client.id));
        assert!(details.animal.is_none());
        assert_eq!(details.time_slot.notes, "Visite");
    }

    #[tokio::test]
    async fn test_revenue_stats() {
        let repo = seeded();
        let stats = repo
            .revenue_stats(RevenuePeriod::Month, today())
            .await
            .unwrap();
        assert_eq!(stats.total_revenue, Money::from_euros(60));
        assert_eq!(stats.prestation_count, 2);
        assert_eq!(stats.average_revenue, Money::from_euros(30));
        assert_eq!(stats.top_services[0].service.name, "Toilettage");
        assert_eq!(stats.monthly_breakdown.get(&1), Some(&Money::from_euros(60)));
    }

    #[tokio::test]
    async fn test_global_search() {
        let repo = seeded();
        let results = repo.global_search("promenade").await.unwrap();
        assert_eq!(results.services.len(), 1);
        assert_eq!(results.prestations.len(), 1);
        assert!(repo.global_search("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let source = seeded();
        let snapshot = source.export_data().await.unwrap();
        assert_eq!(snapshot.record_count(), 15);

        let target = MockAppRepository::empty();
        assert!(target.import_data(snapshot.clone()).await.unwrap());
        let again = target.export_data().await.unwrap();
        assert_eq!(again.clients, snapshot.clients);
        assert_eq!(again.time_slots, snapshot.time_slots);

        let mut bad = snapshot;
        bad.schema_version = "9".into();
        assert!(!target.import_data(bad).await.unwrap());
    }

    #[tokio::test]
    async fn test_read_only_mode() {
        let repo = seeded();
        repo.set_read_only(true);
        let p = repo.prestations().get_all().await.unwrap().remove(0);

        let err = repo
            .prestations()
            .update_status(p.id, PrestationStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, CleoError::ReadOnly(_)));

        repo.set_read_only(false);
        assert!(repo
            .prestations()
            .update_status(p.id, PrestationStatus::Cancelled)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_sync_status_is_never_synced() {
        let status = seeded().sync_status().await.unwrap();
        assert_eq!(status, SyncStatus::never_synced());
    }
}
