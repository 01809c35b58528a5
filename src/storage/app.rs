//! Aggregate repository
//!
//! `AppRepository` exposes the per-entity repositories and adds the
//! cross-entity queries: dashboard counters, entity-with-relations lookups,
//! revenue statistics, global search and snapshot export/import.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CleoResult;
use crate::export::AppDataExport;
use crate::models::{
    Animal, AnimalId, Client, ClientId, Money, Prestation, PrestationId, PrestationWithDetails,
    Service, ServiceId, TimeSlotId, TimeSlotWithDetails,
};

use super::animals::AnimalRepository;
use super::clients::ClientRepository;
use super::prestations::PrestationRepository;
use super::services::ServiceRepository;
use super::time_slots::TimeSlotRepository;

/// Headline counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub total_animals: usize,
    pub total_services: usize,
    pub total_prestations: usize,
    pub today_prestations: usize,
    pub upcoming_prestations: usize,
    /// Completed revenue since the first of the current month
    pub monthly_revenue: Money,
    pub active_clients: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientWithAnimals {
    pub client: Client,
    pub animals: Vec<Animal>,
}

/// Fields of a prestation to create; the id and timestamps are generated
#[derive(Debug, Clone)]
pub struct NewPrestation {
    pub client_id: ClientId,
    pub animal_id: AnimalId,
    pub service_id: ServiceId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub price: Money,
    pub notes: String,
}

/// Fields of a time slot to create
#[derive(Debug, Clone)]
pub struct NewTimeSlot {
    pub client_id: ClientId,
    pub animal_id: AnimalId,
    pub service_id: ServiceId,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub notes: String,
}

/// Window for revenue statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenuePeriod {
    Today,
    Week,
    Month,
    Quarter,
    Year,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl RevenuePeriod {
    /// Inclusive day bounds relative to `today`
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Self::Today => (today, today),
            Self::Week => (
                today - Duration::days(today.weekday().num_days_from_monday() as i64),
                today,
            ),
            Self::Month => (today.with_day(1).unwrap_or(today), today),
            Self::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
                (start, today)
            }
            Self::Year => (today.with_ordinal(1).unwrap_or(today), today),
            Self::Custom { start, end } => (start, end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRevenue {
    pub service: Service,
    pub revenue: Money,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueStats {
    pub total_revenue: Money,
    pub average_revenue: Money,
    pub prestation_count: usize,
    pub top_services: Vec<ServiceRevenue>,
    /// Completed revenue keyed by month number (1-12)
    pub monthly_breakdown: BTreeMap<u32, Money>,
}

/// Per-type matches of a global search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalSearchResults {
    pub clients: Vec<Client>,
    pub animals: Vec<Animal>,
    pub services: Vec<Service>,
    pub prestations: Vec<Prestation>,
}

impl GlobalSearchResults {
    pub fn total(&self) -> usize {
        self.clients.len() + self.animals.len() + self.services.len() + self.prestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub last_sync: Option<DateTime<Utc>>,
    pub is_syncing: bool,
    pub pending_changes: usize,
    pub error_message: Option<String>,
}

impl SyncStatus {
    /// Status of a store that has never synced and has nothing pending
    pub fn never_synced() -> Self {
        Self {
            last_sync: None,
            is_syncing: false,
            pending_changes: 0,
            error_message: None,
        }
    }
}

#[async_trait]
pub trait AppRepository: Send + Sync {
    fn clients(&self) -> &dyn ClientRepository;

    fn animals(&self) -> &dyn AnimalRepository;

    fn services(&self) -> &dyn ServiceRepository;

    fn prestations(&self) -> &dyn PrestationRepository;

    fn time_slots(&self) -> &dyn TimeSlotRepository;

    async fn dashboard_stats(&self, today: NaiveDate) -> CleoResult<DashboardStats>;

    async fn client_with_animals(&self, client_id: ClientId)
        -> CleoResult<Option<ClientWithAnimals>>;

    /// Insert a client and an animal owned by it
    async fn create_client_with_animal(
        &self,
        client: Client,
        animal: Animal,
    ) -> CleoResult<(ClientId, AnimalId)>;

    async fn prestation_details(
        &self,
        prestation_id: PrestationId,
    ) -> CleoResult<Option<PrestationWithDetails>>;

    async fn create_prestation(&self, request: NewPrestation) -> CleoResult<PrestationId>;

    async fn time_slot_details(
        &self,
        time_slot_id: TimeSlotId,
    ) -> CleoResult<Option<TimeSlotWithDetails>>;

    async fn create_time_slot(&self, request: NewTimeSlot) -> CleoResult<TimeSlotId>;

    async fn revenue_stats(&self, period: RevenuePeriod, today: NaiveDate)
        -> CleoResult<RevenueStats>;

    async fn global_search(&self, query: &str) -> CleoResult<GlobalSearchResults>;

    async fn export_data(&self) -> CleoResult<AppDataExport>;

    /// Replace every table with the snapshot content
    async fn import_data(&self, data: AppDataExport) -> CleoResult<bool>;

    async fn sync_status(&self) -> CleoResult<SyncStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_revenue_period_bounds() {
        let today = date(2024, 8, 15);
        assert_eq!(RevenuePeriod::Quarter.bounds(today), (date(2024, 7, 1), today));
        assert_eq!(RevenuePeriod::Year.bounds(today), (date(2024, 1, 1), today));
        assert_eq!(RevenuePeriod::Week.bounds(today), (date(2024, 8, 12), today));
        let custom = RevenuePeriod::Custom {
            start: date(2024, 1, 1),
            end: date(2024, 1, 31),
        };
        assert_eq!(custom.bounds(today), (date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn test_search_results_total() {
        let mut results = GlobalSearchResults::default();
        assert!(results.is_empty());
        results.clients.push(Client::new("Marie", "Dupont"));
        assert_eq!(results.total(), 1);
    }
}
