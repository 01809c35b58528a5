//! Planning calendar view-model
//!
//! Holds the current date and calendar granularity, and the time slots of
//! the window they select. Changing either one reloads the window. Client,
//! animal and service facets narrow the loaded slots.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{
    Animal, AnimalId, CalendarView, Client, ClientId, Service, ServiceId, TimeSlot, TimeSlotId,
    TimeSlotStatus, TimeSlotWithDetails,
};
use crate::storage::{AppRepository, Record};

use super::{ListState, Store, ViewModel};

impl Record for TimeSlotWithDetails {
    type Id = TimeSlotId;

    fn record_id(&self) -> TimeSlotId {
        self.time_slot.id
    }

    fn set_record_id(&mut self, id: TimeSlotId) {
        self.time_slot.id = id;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanningState {
    pub current_date: NaiveDate,
    pub calendar_view: CalendarView,
    /// Slots of the current window, by start time
    pub time_slots: Vec<TimeSlotWithDetails>,
    pub filtered_time_slots: Vec<TimeSlotWithDetails>,
    pub selected_time_slot: Option<TimeSlotWithDetails>,
    pub show_add_dialog: bool,
    pub show_edit_dialog: bool,
    pub clients: Vec<Client>,
    pub animals: Vec<Animal>,
    pub services: Vec<Service>,
    pub client_filter: Option<ClientId>,
    pub animal_filter: Option<AnimalId>,
    pub service_filter: Option<ServiceId>,
}

impl PlanningState {
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            calendar_view: CalendarView::default(),
            time_slots: Vec::new(),
            filtered_time_slots: Vec::new(),
            selected_time_slot: None,
            show_add_dialog: false,
            show_edit_dialog: false,
            clients: Vec::new(),
            animals: Vec::new(),
            services: Vec::new(),
            client_filter: None,
            animal_filter: None,
            service_filter: None,
        }
    }

    /// Inclusive window selected by the current date and view
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.calendar_view.range(self.current_date)
    }

    fn apply_filters(&mut self) {
        self.filtered_time_slots = self
            .time_slots
            .iter()
            .filter(|d| {
                self.client_filter
                    .map_or(true, |id| d.time_slot.client_id == id)
            })
            .filter(|d| {
                self.animal_filter
                    .map_or(true, |id| d.time_slot.animal_id == id)
            })
            .filter(|d| {
                self.service_filter
                    .map_or(true, |id| d.time_slot.service_id == id)
            })
            .cloned()
            .collect();
    }

    /// Attach references from the loaded lists, else from the slot already shown
    fn resolve(&self, time_slot: TimeSlot) -> TimeSlotWithDetails {
        let shown = self
            .time_slots
            .iter()
            .find(|d| d.time_slot.id == time_slot.id);

        let client = self
            .clients
            .iter()
            .find(|c| c.id == time_slot.client_id)
            .cloned()
            .or_else(|| {
                shown
                    .and_then(|d| d.client.clone())
                    .filter(|c| c.id == time_slot.client_id)
            });
        let animal = self
            .animals
            .iter()
            .find(|a| a.id == time_slot.animal_id)
            .cloned()
            .or_else(|| {
                shown
                    .and_then(|d| d.animal.clone())
                    .filter(|a| a.id == time_slot.animal_id)
            });
        let service = self
            .services
            .iter()
            .find(|s| s.id == time_slot.service_id)
            .cloned()
            .or_else(|| {
                shown
                    .and_then(|d| d.service.clone())
                    .filter(|s| s.id == time_slot.service_id)
            });

        TimeSlotWithDetails {
            time_slot,
            client,
            animal,
            service,
        }
    }
}

impl ListState<TimeSlotWithDetails> for PlanningState {
    fn items_mut(&mut self) -> &mut Vec<TimeSlotWithDetails> {
        &mut self.time_slots
    }

    fn refresh(&mut self) {
        self.apply_filters();
    }
}

#[derive(Debug, Clone)]
pub enum PlanningEvent {
    LoadTimeSlots,
    SelectTimeSlot(TimeSlotWithDetails),
    ClearSelectedTimeSlot,
    AddTimeSlot(TimeSlot),
    UpdateTimeSlot(TimeSlot),
    DeleteTimeSlot(TimeSlotId),
    DeleteSelectedTimeSlot,
    SetCurrentDate(NaiveDate),
    SetCalendarView(CalendarView),
    NavigateToPreviousPeriod,
    NavigateToNextPeriod,
    NavigateToToday,
    UpdateTimeSlotStatus(TimeSlotId, TimeSlotStatus),
    LoadClients,
    LoadAnimals,
    LoadServices,
    FilterByClient(Option<ClientId>),
    FilterByAnimal(Option<AnimalId>),
    FilterByService(Option<ServiceId>),
    ClearFilters,
    ShowAddDialog,
    HideAddDialog,
    ShowEditDialog,
    HideEditDialog,
}

pub struct PlanningViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<PlanningState>,
}

impl PlanningViewModel {
    /// Planning positioned on the local current day
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self::on_date(repository, chrono::Local::now().date_naive())
    }

    pub fn on_date(repository: Arc<dyn AppRepository>, date: NaiveDate) -> Self {
        Self {
            repository,
            store: Store::new(PlanningState::new(date)),
        }
    }

    /// Load the current window and the client, animal and service lists
    pub async fn load_initial_data(&self) {
        self.load_time_slots().await;
        self.load_clients().await;
        self.load_animals().await;
        self.load_services().await;
    }

    async fn load_time_slots(&self) {
        let (start, end) = self.store.read(PlanningState::window);
        self.store
            .run(async {
                let slots = self
                    .repository
                    .time_slots()
                    .with_details_for_date_range(start, end)
                    .await?;
                tracing::debug!(count = slots.len(), %start, %end, "loaded planning window");
                self.store.update(|s| {
                    s.time_slots = slots;
                    s.apply_filters();
                });
                Ok(())
            })
            .await;
    }

    async fn load_clients(&self) {
        self.store
            .run(async {
                let clients = self.repository.clients().get_all().await?;
                self.store.update(|s| s.clients = clients);
                Ok(())
            })
            .await;
    }

    async fn load_animals(&self) {
        self.store
            .run(async {
                let animals = self.repository.animals().get_all().await?;
                self.store.update(|s| s.animals = animals);
                Ok(())
            })
            .await;
    }

    async fn load_services(&self) {
        self.store
            .run(async {
                let services = self.repository.services().get_all().await?;
                self.store.update(|s| s.services = services);
                Ok(())
            })
            .await;
    }

    async fn set_current_date(&self, date: NaiveDate) {
        self.store.update(|s| s.current_date = date);
        self.load_time_slots().await;
    }

    async fn navigate(&self, forward: bool) {
        let date = self.store.read(|s| {
            if forward {
                s.calendar_view.next(s.current_date)
            } else {
                s.calendar_view.prev(s.current_date)
            }
        });
        self.set_current_date(date).await;
    }

    async fn add_time_slot(&self, time_slot: TimeSlot) {
        let details = self.store.read(|s| s.resolve(time_slot.clone()));
        self.store.update(|s| s.show_add_dialog = false);
        let insert = self.repository.time_slots().insert(time_slot);
        self.store.add_optimistic(details, insert).await;
    }

    async fn update_time_slot(&self, time_slot: TimeSlot) {
        let details = self.store.read(|s| s.resolve(time_slot.clone()));
        self.store.update(|s| s.show_edit_dialog = false);
        let update = self.repository.time_slots().update(time_slot);
        self.store.update_optimistic(details, update).await;
    }

    async fn delete_time_slot(&self, id: TimeSlotId) {
        let delete = self.repository.time_slots().delete(id);
        self.store
            .delete_optimistic::<TimeSlotWithDetails, _>(id, delete)
            .await;
    }

    async fn delete_selected(&self) {
        let selected = self
            .store
            .read(|s| s.selected_time_slot.as_ref().map(|d| d.time_slot.id));
        if let Some(id) = selected {
            self.store.update(|s| s.selected_time_slot = None);
            self.delete_time_slot(id).await;
        }
    }

    /// Status changes are confirmed by the repository before the window reloads
    async fn update_status(&self, id: TimeSlotId, status: TimeSlotStatus) {
        let mut updated = false;
        self.store
            .run(async {
                updated = self.repository.time_slots().update_status(id, status).await?;
                Ok(())
            })
            .await;
        if updated {
            self.load_time_slots().await;
        }
    }

    fn filter(&self, f: impl FnOnce(&mut PlanningState)) {
        self.store.update(|s| {
            f(s);
            s.apply_filters();
        });
    }
}

#[async_trait]
impl ViewModel for PlanningViewModel {
    type State = PlanningState;
    type Event = PlanningEvent;

    fn store(&self) -> &Store<PlanningState> {
        &self.store
    }

    async fn handle_event(&self, event: PlanningEvent) {
        match event {
            PlanningEvent::LoadTimeSlots => self.load_time_slots().await,
            PlanningEvent::SelectTimeSlot(details) => {
                self.store.update(|s| s.selected_time_slot = Some(details))
            }
            PlanningEvent::ClearSelectedTimeSlot => {
                self.store.update(|s| s.selected_time_slot = None)
            }
            PlanningEvent::AddTimeSlot(time_slot) => self.add_time_slot(time_slot).await,
            PlanningEvent::UpdateTimeSlot(time_slot) => self.update_time_slot(time_slot).await,
            PlanningEvent::DeleteTimeSlot(id) => self.delete_time_slot(id).await,
            PlanningEvent::DeleteSelectedTimeSlot => self.delete_selected().await,
            PlanningEvent::SetCurrentDate(date) => self.set_current_date(date).await,
            PlanningEvent::SetCalendarView(view) => {
                self.store.update(|s| s.calendar_view = view);
                self.load_time_slots().await
            }
            PlanningEvent::NavigateToPreviousPeriod => self.navigate(false).await,
            PlanningEvent::NavigateToNextPeriod => self.navigate(true).await,
            PlanningEvent::NavigateToToday => {
                self.set_current_date(chrono::Local::now().date_naive())
                    .await
            }
            PlanningEvent::UpdateTimeSlotStatus(id, status) => {
                self.update_status(id, status).await
            }
            PlanningEvent::LoadClients => self.load_clients().await,
            PlanningEvent::LoadAnimals => self.load_animals().await,
            PlanningEvent::LoadServices => self.load_services().await,
            PlanningEvent::FilterByClient(id) => self.filter(|s| s.client_filter = id),
            PlanningEvent::FilterByAnimal(id) => self.filter(|s| s.animal_filter = id),
            PlanningEvent::FilterByService(id) => self.filter(|s| s.service_filter = id),
            PlanningEvent::ClearFilters => self.filter(|s| {
                s.client_filter = None;
                s.animal_filter = None;
                s.service_filter = None;
            }),
            PlanningEvent::ShowAddDialog => self.store.update(|s| s.show_add_dialog = true),
            PlanningEvent::HideAddDialog => self.store.update(|s| s.show_add_dialog = false),
            PlanningEvent::ShowEditDialog => self.store.update(|s| s.show_edit_dialog = true),
            PlanningEvent::HideEditDialog => self.store.update(|s| s.show_edit_dialog = false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp;
    use crate::viewmodel::testing::{sample_repo, today};
    use chrono::Duration;

    async fn loaded() -> (PlanningViewModel, Arc<crate::storage::MockAppRepository>) {
        let repo = sample_repo();
        let vm = PlanningViewModel::on_date(repo.clone(), today());
        vm.load_initial_data().await;
        (vm, repo)
    }

    #[tokio::test]
    async fn test_day_window_and_navigation() {
        let (vm, _) = loaded().await;
        let state = vm.state();
        assert_eq!(state.calendar_view, CalendarView::Day);
        assert_eq!(state.time_slots.len(), 3);
        assert_eq!(state.clients.len(), 2);

        // slots arrive by start time
        let hours: Vec<_> = state
            .time_slots
            .iter()
            .map(|d| d.time_slot.start_date_time)
            .collect();
        let mut sorted = hours.clone();
        sorted.sort();
        assert_eq!(hours, sorted);

        vm.handle_event(PlanningEvent::NavigateToNextPeriod).await;
        let state = vm.state();
        assert_eq!(state.current_date, today() + Duration::days(1));
        assert_eq!(state.time_slots.len(), 1);

        vm.handle_event(PlanningEvent::NavigateToPreviousPeriod).await;
        assert_eq!(vm.state().current_date, today());
    }

    #[tokio::test]
    async fn test_week_window_bounds() {
        let (vm, _) = loaded().await;
        vm.handle_event(PlanningEvent::SetCalendarView(CalendarView::Week))
            .await;
        let state = vm.state();
        assert_eq!(state.time_slots.len(), 4);

        let (start, end) = state.window();
        assert_eq!(start.timestamp_millis(), 1_705_276_800_000);
        assert_eq!(
            end.timestamp_millis(),
            1_705_276_800_000 + 7 * 24 * 60 * 60 * 1000 - 1
        );
    }

    #[tokio::test]
    async fn test_month_navigation_uses_calendar_months() {
        let (vm, _) = loaded().await;
        vm.handle_event(PlanningEvent::SetCalendarView(CalendarView::Month))
            .await;
        vm.handle_event(PlanningEvent::NavigateToNextPeriod).await;
        assert_eq!(
            vm.state().current_date,
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
        assert!(vm.state().time_slots.is_empty());
    }

    #[tokio::test]
    async fn test_facets_narrow_loaded_slots() {
        let (vm, _) = loaded().await;
        let jean = vm.state().clients[1].id;
        vm.handle_event(PlanningEvent::FilterByClient(Some(jean))).await;
        let state = vm.state();
        assert_eq!(state.filtered_time_slots.len(), 1);
        assert_eq!(state.filtered_time_slots[0].animal_name(), "Rex");

        vm.handle_event(PlanningEvent::ClearFilters).await;
        assert_eq!(vm.state().filtered_time_slots.len(), 3);
    }

    #[tokio::test]
    async fn test_add_resolves_details_and_closes_dialog() {
        let (vm, repo) = loaded().await;
        vm.handle_event(PlanningEvent::ShowAddDialog).await;

        let state = vm.state();
        let start = timestamp::at(today(), 18, 0);
        let slot = TimeSlot::new(
            state.clients[1].id,
            state.animals[2].id,
            state.services[0].id,
            start,
            start + Duration::minutes(30),
        );
        vm.handle_event(PlanningEvent::AddTimeSlot(slot)).await;

        let state = vm.state();
        assert!(!state.show_add_dialog);
        assert_eq!(state.time_slots.len(), 4);
        let added = &state.time_slots[3];
        assert_eq!(added.client_name(), "Jean Martin");
        assert_eq!(added.service_name(), "Promenade");
        assert_eq!(repo.time_slots().count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_status_update_reloads_window() {
        let (vm, repo) = loaded().await;
        let first = vm.state().time_slots[0].time_slot.id;
        vm.handle_event(PlanningEvent::UpdateTimeSlotStatus(
            first,
            TimeSlotStatus::Completed,
        ))
        .await;

        assert_eq!(
            vm.state().time_slots[0].time_slot.status,
            TimeSlotStatus::Completed
        );
        let stored = repo.time_slots().get_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.status, TimeSlotStatus::Completed);
    }

    #[tokio::test]
    async fn test_rejected_delete_selected_restores_slot() {
        let (vm, repo) = loaded().await;
        let before = vm.state().time_slots;
        vm.handle_event(PlanningEvent::SelectTimeSlot(before[1].clone()))
            .await;
        repo.set_read_only(true);

        vm.handle_event(PlanningEvent::DeleteSelectedTimeSlot).await;
        let state = vm.state();
        assert!(state.selected_time_slot.is_none());
        assert_eq!(state.time_slots, before);
        assert!(vm.error_message().is_some());
    }

    #[tokio::test]
    async fn test_rejected_update_restores_slot() {
        let (vm, repo) = loaded().await;
        let before = vm.state().time_slots;
        repo.set_read_only(true);

        let mut moved = before[0].time_slot.clone();
        moved.notes = "Décalé".into();
        vm.handle_event(PlanningEvent::UpdateTimeSlot(moved)).await;
        assert_eq!(vm.state().time_slots, before);
    }
}
