//! Dashboard view-model
//!
//! Aggregates the prestations of the selected date range into headline
//! statistics, recent and upcoming lists, and client and service rankings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::export::AppDataExport;
use crate::models::{
    Client, ClientId, DateRange, Money, Prestation, PrestationStatus, Service, ServiceId,
};
use crate::storage::AppRepository;

use super::{Store, ViewModel};

const RECENT_LIMIT: usize = 10;
const TOP_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStatistics {
    pub total_prestations: usize,
    pub completed_prestations: usize,
    pub pending_prestations: usize,
    pub cancelled_prestations: usize,
    pub total_revenue: Money,
    /// Revenue per completed prestation
    pub average_revenue: Money,
    /// Completed over total, 0 when the range is empty
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientStats {
    pub client: Client,
    pub prestation_count: usize,
    pub total_revenue: Money,
    pub last_prestation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceStats {
    pub service: Service,
    pub usage_count: usize,
    pub total_revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub statistics: DashboardStatistics,
    pub recent_prestations: Vec<Prestation>,
    pub upcoming_prestations: Vec<Prestation>,
    pub top_clients: Vec<ClientStats>,
    pub top_services: Vec<ServiceStats>,
    pub total_clients: usize,
    pub total_animals: usize,
    pub total_services: usize,
    pub total_prestations: usize,
}

fn completed_revenue(items: &[&Prestation]) -> Money {
    items.iter().filter(|p| p.is_completed()).map(|p| p.price).sum()
}

impl DashboardData {
    /// Compute the dashboard for the day bounds `[start, end]`
    pub fn compute(
        clients: &[Client],
        animal_count: usize,
        services: &[Service],
        prestations: &[Prestation],
        today: NaiveDate,
        (start, end): (NaiveDate, NaiveDate),
    ) -> Self {
        let in_range: Vec<&Prestation> = prestations
            .iter()
            .filter(|p| (start..=end).contains(&p.start_day()))
            .collect();

        let count =
            |status: PrestationStatus| in_range.iter().filter(|p| p.status == status).count();

        let completed = count(PrestationStatus::Completed);
        let total_revenue = completed_revenue(&in_range);
        let statistics = DashboardStatistics {
            total_prestations: in_range.len(),
            completed_prestations: completed,
            pending_prestations: count(PrestationStatus::Planned),
            cancelled_prestations: count(PrestationStatus::Cancelled),
            total_revenue,
            average_revenue: Money::average(total_revenue, completed),
            completion_rate: if in_range.is_empty() {
                0.0
            } else {
                completed as f64 / in_range.len() as f64
            },
        };

        let mut recent: Vec<Prestation> = prestations
            .iter()
            .filter(|p| p.start_day() <= today)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        recent.truncate(RECENT_LIMIT);

        let mut upcoming: Vec<Prestation> = prestations
            .iter()
            .filter(|p| p.start_day() > today)
            .cloned()
            .collect();
        upcoming.sort_by_key(|p| p.start_date);
        upcoming.truncate(RECENT_LIMIT);

        let mut top_clients: Vec<ClientStats> = clients
            .iter()
            .map(|client| {
                let own: Vec<&Prestation> = in_range
                    .iter()
                    .copied()
                    .filter(|p| p.client_id == client.id)
                    .collect();
                ClientStats {
                    client: client.clone(),
                    prestation_count: own.len(),
                    total_revenue: completed_revenue(&own),
                    last_prestation_date: own.iter().map(|p| p.start_day()).max(),
                }
            })
            .collect();
        top_clients.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
        top_clients.truncate(TOP_LIMIT);

        let mut top_services: Vec<ServiceStats> = services
            .iter()
            .map(|service| {
                let own: Vec<&Prestation> = in_range
                    .iter()
                    .copied()
                    .filter(|p| p.service_id == service.id)
                    .collect();
                ServiceStats {
                    service: service.clone(),
                    usage_count: own.len(),
                    total_revenue: completed_revenue(&own),
                }
            })
            .collect();
        top_services.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
        top_services.truncate(TOP_LIMIT);

        Self {
            statistics,
            recent_prestations: recent,
            upcoming_prestations: upcoming,
            top_clients,
            top_services,
            total_clients: clients.len(),
            total_animals: animal_count,
            total_services: services.len(),
            total_prestations: prestations.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub today: NaiveDate,
    pub date_range: DateRange,
    pub data: DashboardData,
    pub selected_client_id: Option<ClientId>,
    pub selected_service_id: Option<ServiceId>,
    /// Snapshot produced by the last `ExportData`
    pub last_export: Option<AppDataExport>,
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    LoadDashboardData,
    SetDateRange(DateRange),
    RefreshData,
    ExportData,
    ShowClientDetails(ClientId),
    ShowServiceDetails(ServiceId),
}

pub struct DashboardViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<DashboardState>,
}

impl DashboardViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self::as_of(repository, chrono::Local::now().date_naive())
    }

    /// Dashboard computed relative to `today`
    pub fn as_of(repository: Arc<dyn AppRepository>, today: NaiveDate) -> Self {
        Self {
            repository,
            store: Store::new(DashboardState {
                today,
                date_range: DateRange::default(),
                data: DashboardData::default(),
                selected_client_id: None,
                selected_service_id: None,
                last_export: None,
            }),
        }
    }

    async fn load(&self) {
        let (today, range) = self.store.read(|s| (s.today, s.date_range));
        self.store
            .run(async {
                let clients = self.repository.clients().get_all().await?;
                let animal_count = self.repository.animals().count().await?;
                let services = self.repository.services().get_all().await?;
                let prestations = self.repository.prestations().get_all().await?;

                let data = DashboardData::compute(
                    &clients,
                    animal_count,
                    &services,
                    &prestations,
                    today,
                    range.bounds(today),
                );
                tracing::debug!(
                    range = %range,
                    prestations = data.statistics.total_prestations,
                    revenue = %data.statistics.total_revenue,
                    "dashboard computed"
                );
                self.store.update(|s| s.data = data);
                Ok(())
            })
            .await;
    }

    async fn export(&self) {
        self.store
            .run(async {
                let snapshot = self.repository.export_data().await?;
                self.store.update(|s| s.last_export = Some(snapshot));
                Ok(())
            })
            .await;
    }
}

#[async_trait]
impl ViewModel for DashboardViewModel {
    type State = DashboardState;
    type Event = DashboardEvent;

    fn store(&self) -> &Store<DashboardState> {
        &self.store
    }

    async fn handle_event(&self, event: DashboardEvent) {
        match event {
            DashboardEvent::LoadDashboardData | DashboardEvent::RefreshData => self.load().await,
            DashboardEvent::SetDateRange(range) => {
                self.store.update(|s| s.date_range = range);
                self.load().await
            }
            DashboardEvent::ExportData => self.export().await,
            DashboardEvent::ShowClientDetails(id) => {
                self.store.update(|s| s.selected_client_id = Some(id))
            }
            DashboardEvent::ShowServiceDetails(id) => {
                self.store.update(|s| s.selected_service_id = Some(id))
            }
        }
    }
}
