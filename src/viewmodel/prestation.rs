//! Prestation list view-model

use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::CleoError;
use crate::models::{AnimalId, ClientId, Money, Prestation, PrestationId, PrestationStatus};
use crate::storage::AppRepository;

use super::{ListState, Store, ViewModel};

/// Counters over the loaded prestations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrestationStats {
    pub total: usize,
    pub completed: usize,
    /// Still planned
    pub pending: usize,
    pub cancelled: usize,
    pub today: usize,
    /// Sum of completed prices
    pub revenue: Money,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrestationState {
    pub prestations: Vec<Prestation>,
    pub filtered_prestations: Vec<Prestation>,
    pub selected_prestation: Option<Prestation>,
    pub search_query: String,
    /// Inclusive bounds on the UTC day of `start_date`
    pub date_filter: Option<RangeInclusive<NaiveDate>>,
    pub status_filter: Option<PrestationStatus>,
    pub client_filter: Option<ClientId>,
    pub animal_filter: Option<AnimalId>,
}

impl PrestationState {
    fn apply_filters(&mut self) {
        let query = self.search_query.trim();
        self.filtered_prestations = self
            .prestations
            .iter()
            .filter(|p| {
                self.date_filter
                    .as_ref()
                    .map_or(true, |r| r.contains(&p.start_day()))
            })
            .filter(|p| self.status_filter.map_or(true, |st| p.status == st))
            .filter(|p| self.client_filter.map_or(true, |id| p.client_id == id))
            .filter(|p| self.animal_filter.map_or(true, |id| p.animal_id == id))
            .filter(|p| query.is_empty() || p.matches_query(query))
            .cloned()
            .collect();
    }

    pub fn prestations_for_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Prestation> {
        self.prestations
            .iter()
            .filter(|p| (start..=end).contains(&p.start_day()))
            .cloned()
            .collect()
    }

    pub fn prestations_by_status(&self, status: PrestationStatus) -> Vec<Prestation> {
        self.prestations
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect()
    }

    /// Prestations starting on or after `today`, soonest first
    pub fn upcoming_prestations(&self, today: NaiveDate) -> Vec<Prestation> {
        let mut upcoming: Vec<_> = self
            .prestations
            .iter()
            .filter(|p| p.start_day() >= today)
            .cloned()
            .collect();
        upcoming.sort_by_key(|p| p.start_date);
        upcoming
    }

    pub fn total_revenue_for_date_range(&self, start: NaiveDate, end: NaiveDate) -> Money {
        self.prestations_for_date_range(start, end)
            .iter()
            .filter(|p| p.is_completed())
            .map(|p| p.price)
            .sum()
    }

    pub fn stats(&self, today: NaiveDate) -> PrestationStats {
        let count = |status: PrestationStatus| {
            self.prestations
                .iter()
                .filter(|p| p.status == status)
                .count()
        };
        PrestationStats {
            total: self.prestations.len(),
            completed: count(PrestationStatus::Completed),
            pending: count(PrestationStatus::Planned),
            cancelled: count(PrestationStatus::Cancelled),
            today: self
                .prestations
                .iter()
                .filter(|p| p.start_day() == today)
                .count(),
            revenue: self
                .prestations
                .iter()
                .filter(|p| p.is_completed())
                .map(|p| p.price)
                .sum(),
        }
    }

    fn find(&self, id: PrestationId) -> Option<Prestation> {
        self.prestations.iter().find(|p| p.id == id).cloned()
    }
}

impl ListState<Prestation> for PrestationState {
    fn items_mut(&mut self) -> &mut Vec<Prestation> {
        &mut self.prestations
    }

    fn refresh(&mut self) {
        self.apply_filters();
    }
}

#[derive(Debug, Clone)]
pub enum PrestationEvent {
    LoadPrestations,
    SelectPrestation(Prestation),
    DeselectPrestation,
    SearchPrestations(String),
    AddPrestation(Prestation),
    UpdatePrestation(Prestation),
    DeletePrestation(PrestationId),
    FilterByDateRange { start: NaiveDate, end: NaiveDate },
    FilterByStatus(Option<PrestationStatus>),
    FilterByClient(Option<ClientId>),
    FilterByAnimal(Option<AnimalId>),
    ClearDateFilter,
    ClearStatusFilter,
    ClearClientFilter,
    ClearAnimalFilter,
    ClearAllFilters,
    ClearSearch,
    UpdatePrestationStatus(PrestationId, PrestationStatus),
    /// Reprice a prestation from its service's catalogue price
    CalculateTotalPrice(PrestationId),
}

pub struct PrestationViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<PrestationState>,
}

impl PrestationViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self {
            repository,
            store: Store::new(PrestationState::default()),
        }
    }

    async fn load_prestations(&self) {
        self.store
            .run(async {
                let prestations = self.repository.prestations().get_all().await?;
                tracing::debug!(count = prestations.len(), "loaded prestations");
                self.store.update(|s| {
                    s.prestations = prestations;
                    s.apply_filters();
                });
                Ok(())
            })
            .await;
    }

    fn filter(&self, f: impl FnOnce(&mut PrestationState)) {
        self.store.update(|s| {
            f(s);
            s.apply_filters();
        });
    }

    async fn update_prestation(&self, prestation: Prestation) {
        let update = self.repository.prestations().update(prestation.clone());
        self.store.update_optimistic(prestation, update).await;
    }

    async fn update_status(&self, id: PrestationId, status: PrestationStatus) {
        if let Some(mut prestation) = self.store.read(|s| s.find(id)) {
            prestation.status = status;
            self.update_prestation(prestation).await;
        }
    }

    async fn calculate_total_price(&self, id: PrestationId) {
        let Some(mut prestation) = self.store.read(|s| s.find(id)) else {
            return;
        };

        let mut service = None;
        self.store
            .run(async {
                service = self
                    .repository
                    .services()
                    .get_by_id(prestation.service_id)
                    .await?;
                if service.is_none() {
                    return Err(CleoError::service_not_found(prestation.service_id.to_string()));
                }
                Ok(())
            })
            .await;

        if let Some(service) = service {
            if service.price != prestation.price {
                prestation.price = service.price;
                self.update_prestation(prestation).await;
            }
        }
    }
}

#[async_trait]
impl ViewModel for PrestationViewModel {
    type State = PrestationState;
    type Event = PrestationEvent;

    fn store(&self) -> &Store<PrestationState> {
        &self.store
    }

    async fn handle_event(&self, event: PrestationEvent) {
        match event {
            PrestationEvent::LoadPrestations => self.load_prestations().await,
            PrestationEvent::SelectPrestation(prestation) => {
                self.store.update(|s| s.selected_prestation = Some(prestation))
            }
            PrestationEvent::DeselectPrestation => {
                self.store.update(|s| s.selected_prestation = None)
            }
            PrestationEvent::SearchPrestations(query) => self.filter(|s| s.search_query = query),
            PrestationEvent::AddPrestation(prestation) => {
                let insert = self.repository.prestations().insert(prestation.clone());
                self.store.add_optimistic(prestation, insert).await
            }
            PrestationEvent::UpdatePrestation(prestation) => {
                self.update_prestation(prestation).await
            }
            PrestationEvent::DeletePrestation(id) => {
                self.store.update(|s| {
                    if s.selected_prestation.as_ref().map(|p| p.id) == Some(id) {
                        s.selected_prestation = None;
                    }
                });
                let delete = self.repository.prestations().delete(id);
                self.store.delete_optimistic::<Prestation, _>(id, delete).await
            }
            PrestationEvent::FilterByDateRange { start, end } => {
                self.filter(|s| s.date_filter = Some(start..=end))
            }
            PrestationEvent::FilterByStatus(status) => self.filter(|s| s.status_filter = status),
            PrestationEvent::FilterByClient(id) => self.filter(|s| s.client_filter = id),
            PrestationEvent::FilterByAnimal(id) => self.filter(|s| s.animal_filter = id),
            PrestationEvent::ClearDateFilter => self.filter(|s| s.date_filter = None),
            PrestationEvent::ClearStatusFilter => self.filter(|s| s.status_filter = None),
            PrestationEvent::ClearClientFilter => self.filter(|s| s.client_filter = None),
            PrestationEvent::ClearAnimalFilter => self.filter(|s| s.animal_filter = None),
            PrestationEvent::ClearAllFilters => self.filter(|s| {
                s.date_filter = None;
                s.status_filter = None;
                s.client_filter = None;
                s.animal_filter = None;
                s.search_query.clear();
            }),
            PrestationEvent::ClearSearch => self.filter(|s| s.search_query.clear()),
            PrestationEvent::UpdatePrestationStatus(id, status) => {
                self.update_status(id, status).await
            }
            PrestationEvent::CalculateTotalPrice(id) => self.calculate_total_price(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodel::testing::{sample_repo, today};
    use chrono::Duration;

    async fn loaded() -> (PrestationViewModel, Arc<crate::storage::MockAppRepository>) {
        let repo = sample_repo();
        let vm = PrestationViewModel::new(repo.clone());
        vm.handle_event(PrestationEvent::LoadPrestations).await;
        (vm, repo)
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive_by_day() {
        let (vm, _) = loaded().await;
        let day = today();
        vm.handle_event(PrestationEvent::FilterByDateRange {
            start: day - Duration::days(2),
            end: day - Duration::days(1),
        })
        .await;
        assert_eq!(vm.state().filtered_prestations.len(), 2);

        vm.handle_event(PrestationEvent::FilterByStatus(Some(PrestationStatus::Planned)))
            .await;
        assert!(vm.state().filtered_prestations.is_empty());

        vm.handle_event(PrestationEvent::ClearDateFilter).await;
        assert_eq!(vm.state().filtered_prestations.len(), 1);
    }

    #[tokio::test]
    async fn test_query_matches_notes_and_status() {
        let (vm, _) = loaded().await;
        vm.handle_event(PrestationEvent::SearchPrestations("parc".into()))
            .await;
        assert_eq!(vm.state().filtered_prestations.len(), 1);

        vm.handle_event(PrestationEvent::SearchPrestations("completed".into()))
            .await;
        assert_eq!(vm.state().filtered_prestations.len(), 2);

        vm.handle_event(PrestationEvent::ClearAllFilters).await;
        assert_eq!(vm.state().filtered_prestations.len(), 3);
    }

    #[tokio::test]
    async fn test_stats_and_revenue() {
        let (vm, _) = loaded().await;
        let state = vm.state();
        let stats = state.stats(today());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.cancelled, 0);
        assert_eq!(stats.today, 0);
        assert_eq!(stats.revenue, Money::from_euros(60));

        let day = today();
        assert_eq!(
            state.total_revenue_for_date_range(day - Duration::days(1), day + Duration::days(5)),
            Money::from_euros(45)
        );
        let upcoming = state.upcoming_prestations(day);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].status, PrestationStatus::Planned);
        assert_eq!(state.prestations_by_status(PrestationStatus::Completed).len(), 2);
    }

    #[tokio::test]
    async fn test_status_update_goes_through_repository() {
        let (vm, repo) = loaded().await;
        let planned = vm.state().prestations[2].id;
        vm.handle_event(PrestationEvent::UpdatePrestationStatus(
            planned,
            PrestationStatus::Cancelled,
        ))
        .await;

        assert_eq!(vm.state().prestations[2].status, PrestationStatus::Cancelled);
        let stored = repo.prestations().get_by_id(planned).await.unwrap().unwrap();
        assert_eq!(stored.status, PrestationStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_rejected_update_restores_prior_record() {
        let (vm, repo) = loaded().await;
        let before = vm.state().prestations;
        repo.set_read_only(true);

        let mut edited = before[0].clone();
        edited.notes = "Changement".into();
        vm.handle_event(PrestationEvent::UpdatePrestation(edited)).await;

        assert_eq!(vm.state().prestations, before);
        assert!(vm.error_message().is_some());
    }

    #[tokio::test]
    async fn test_calculate_total_price_uses_catalogue() {
        let (vm, repo) = loaded().await;
        let mut discounted = vm.state().prestations[0].clone();
        discounted.price = Money::from_euros(10);
        vm.handle_event(PrestationEvent::UpdatePrestation(discounted.clone()))
            .await;

        vm.handle_event(PrestationEvent::CalculateTotalPrice(discounted.id))
            .await;
        assert_eq!(vm.state().prestations[0].price, Money::from_euros(15));
        let stored = repo
            .prestations()
            .get_by_id(discounted.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.price, Money::from_euros(15));
    }
}
