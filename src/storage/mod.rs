//! Storage layer for CleoPattes
//!
//! Async repository contracts per entity, the aggregate `AppRepository`,
//! and the in-memory implementation used by the application and tests.
//! Data lives only for the lifetime of the process.

pub mod animals;
pub mod app;
pub mod clients;
pub mod mock;
pub mod prestations;
pub mod seed;
pub mod services;
pub mod table;
pub mod time_slots;

pub use animals::AnimalRepository;
pub use app::{
    AppRepository, ClientWithAnimals, DashboardStats, GlobalSearchResults, NewPrestation,
    NewTimeSlot, RevenuePeriod, RevenueStats, ServiceRevenue, SyncStatus,
};
pub use clients::ClientRepository;
pub use mock::MockAppRepository;
pub use prestations::PrestationRepository;
pub use seed::SeedConfig;
pub use services::ServiceRepository;
pub use table::Record;
pub use time_slots::TimeSlotRepository;
