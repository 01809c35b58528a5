//! Core data models for CleoPattes
//!
//! Plain value records for the pet-sitting domain: clients, their animals,
//! the services offered, booked prestations and planning time slots.

pub mod animal;
pub mod calendar;
pub mod client;
pub mod ids;
pub mod money;
pub mod prestation;
pub mod service;
pub mod time_slot;
pub mod timestamp;

pub use animal::{Animal, Species};
pub use calendar::{CalendarView, DateRange};
pub use client::{Client, ClientValidationError};
pub use ids::{AnimalId, ClientId, PrestationId, ServiceId, TimeSlotId};
pub use money::{Money, MoneyParseError};
pub use prestation::{Prestation, PrestationStatus, PrestationWithDetails};
pub use service::Service;
pub use time_slot::{TimeSlot, TimeSlotStatus, TimeSlotWithDetails};
