//! Service catalogue view-model

use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Money, Service, ServiceId};
use crate::storage::AppRepository;

use super::{ListState, Store, ViewModel};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceState {
    pub services: Vec<Service>,
    pub filtered_services: Vec<Service>,
    pub selected_service: Option<Service>,
    pub search_query: String,
    /// Exact service name, compared case-insensitively
    pub category_filter: Option<String>,
    pub price_filter: Option<RangeInclusive<Money>>,
    /// Duration bounds in minutes
    pub duration_filter: Option<RangeInclusive<u32>>,
}

impl ServiceState {
    fn apply_filters(&mut self) {
        let query = self.search_query.trim();
        let category = self.category_filter.as_deref().map(str::to_lowercase);
        self.filtered_services = self
            .services
            .iter()
            .filter(|s| {
                category
                    .as_deref()
                    .map_or(true, |c| s.name.to_lowercase() == c)
            })
            .filter(|s| {
                self.price_filter
                    .as_ref()
                    .map_or(true, |r| r.contains(&s.price))
            })
            .filter(|s| {
                self.duration_filter
                    .as_ref()
                    .map_or(true, |r| r.contains(&s.duration_minutes))
            })
            .filter(|s| query.is_empty() || s.matches_query(query))
            .cloned()
            .collect();
    }

    /// Distinct service names, sorted
    pub fn available_categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|s| s.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Cheapest to most expensive price, `None` with no services
    pub fn price_range(&self) -> Option<RangeInclusive<Money>> {
        let min = self.services.iter().map(|s| s.price).min()?;
        let max = self.services.iter().map(|s| s.price).max()?;
        Some(min..=max)
    }

    pub fn active_services(&self) -> Vec<Service> {
        self.services.iter().filter(|s| s.is_active).cloned().collect()
    }
}

impl ListState<Service> for ServiceState {
    fn items_mut(&mut self) -> &mut Vec<Service> {
        &mut self.services
    }

    fn refresh(&mut self) {
        self.apply_filters();
    }
}

#[derive(Debug, Clone)]
pub enum ServiceEvent {
    LoadServices,
    SelectService(Service),
    DeselectService,
    SearchServices(String),
    AddService(Service),
    UpdateService(Service),
    DeleteService(ServiceId),
    FilterByCategory(Option<String>),
    FilterByPriceRange { min: Money, max: Money },
    FilterByDurationRange { min: u32, max: u32 },
    ClearCategoryFilter,
    ClearPriceFilter,
    ClearDurationFilter,
    ClearAllFilters,
    ClearSearch,
    ToggleServiceActive(ServiceId),
}

pub struct ServiceViewModel {
    repository: Arc<dyn AppRepository>,
    store: Store<ServiceState>,
}

impl ServiceViewModel {
    pub fn new(repository: Arc<dyn AppRepository>) -> Self {
        Self {
            repository,
            store: Store::new(ServiceState::default()),
        }
    }

    async fn load_services(&self) {
        self.store
            .run(async {
                let services = self.repository.services().get_all().await?;
                tracing::debug!(count = services.len(), "loaded services");
                self.store.update(|s| {
                    s.services = services;
                    s.apply_filters();
                });
                Ok(())
            })
            .await;
    }

    fn filter(&self, f: impl FnOnce(&mut ServiceState)) {
        self.store.update(|s| {
            f(s);
            s.apply_filters();
        });
    }

    async fn update_service(&self, service: Service) {
        let update = self.repository.services().update(service.clone());
        self.store.update_optimistic(service, update).await;
    }

    async fn toggle_active(&self, id: ServiceId) {
        let toggled = self.store.read(|s| {
            s.services.iter().find(|svc| svc.id == id).cloned().map(|mut svc| {
                svc.is_active = !svc.is_active;
                svc
            })
        });
        if let Some(service) = toggled {
            self.update_service(service).await;
        }
    }
}

#[async_trait]
impl ViewModel for ServiceViewModel {
    type State = ServiceState;
    type Event = ServiceEvent;

    fn store(&self) -> &Store<ServiceState> {
        &self.store
    }

    async fn handle_event(&self, event: ServiceEvent) {
        match event {
            ServiceEvent::LoadServices => self.load_services().await,
            ServiceEvent::SelectService(service) => {
                self.store.update(|s| s.selected_service = Some(service))
            }
            ServiceEvent::DeselectService => self.store.update(|s| s.selected_service = None),
            ServiceEvent::SearchServices(query) => self.filter(|s| s.search_query = query),
            ServiceEvent::AddService(service) => {
                let insert = self.repository.services().insert(service.clone());
                self.store.add_optimistic(service, insert).await
            }
            ServiceEvent::UpdateService(service) => self.update_service(service).await,
            ServiceEvent::DeleteService(id) => {
                self.store.update(|s| {
                    if s.selected_service.as_ref().map(|svc| svc.id) == Some(id) {
                        s.selected_service = None;
                    }
                });
                let delete = self.repository.services().delete(id);
                self.store.delete_optimistic::<Service, _>(id, delete).await
            }
            ServiceEvent::FilterByCategory(category) => {
                self.filter(|s| s.category_filter = category)
            }
            ServiceEvent::FilterByPriceRange { min, max } => {
                self.filter(|s| s.price_filter = Some(min..=max))
            }
            ServiceEvent::FilterByDurationRange { min, max } => {
                self.filter(|s| s.duration_filter = Some(min..=max))
            }
            ServiceEvent::ClearCategoryFilter => self.filter(|s| s.category_filter = None),
            ServiceEvent::ClearPriceFilter => self.filter(|s| s.price_filter = None),
            ServiceEvent::ClearDurationFilter => self.filter(|s| s.duration_filter = None),
            ServiceEvent::ClearAllFilters => self.filter(|s| {
                s.category_filter = None;
                s.price_filter = None;
                s.duration_filter = None;
                s.search_query.clear();
            }),
            ServiceEvent::ClearSearch => self.filter(|s| s.search_query.clear()),
            ServiceEvent::ToggleServiceActive(id) => self.toggle_active(id).await,
        }
    }
}
