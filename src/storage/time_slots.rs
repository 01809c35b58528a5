//! Time slot repository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::CleoResult;
use crate::models::{
    timestamp, AnimalId, ClientId, ServiceId, TimeSlot, TimeSlotId, TimeSlotStatus,
    TimeSlotWithDetails,
};

use super::table::Tables;

#[async_trait]
pub trait TimeSlotRepository: Send + Sync {
    async fn get_all(&self) -> CleoResult<Vec<TimeSlot>>;

    async fn get_by_id(&self, id: TimeSlotId) -> CleoResult<Option<TimeSlot>>;

    /// Slots starting on the UTC day `date`
    async fn get_for_date(&self, date: NaiveDate) -> CleoResult<Vec<TimeSlot>>;

    /// Slots starting within `[start, end]`
    async fn get_for_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<TimeSlot>>;

    async fn get_for_client(&self, client_id: ClientId) -> CleoResult<Vec<TimeSlot>>;

    async fn get_for_animal(&self, animal_id: AnimalId) -> CleoResult<Vec<TimeSlot>>;

    async fn get_for_service(&self, service_id: ServiceId) -> CleoResult<Vec<TimeSlot>>;

    async fn get_by_status(&self, status: TimeSlotStatus) -> CleoResult<Vec<TimeSlot>>;

    async fn get_upcoming(&self, now: DateTime<Utc>) -> CleoResult<Vec<TimeSlot>>;

    async fn get_past(&self, now: DateTime<Utc>) -> CleoResult<Vec<TimeSlot>>;

    /// Whether `[start, end]` overlaps an active slot other than `exclude`
    async fn has_conflict(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<TimeSlotId>,
    ) -> CleoResult<bool>;

    async fn insert(&self, time_slot: TimeSlot) -> CleoResult<TimeSlotId>;

    async fn update(&self, time_slot: TimeSlot) -> CleoResult<bool>;

    async fn delete(&self, id: TimeSlotId) -> CleoResult<bool>;

    async fn update_status(&self, id: TimeSlotId, status: TimeSlotStatus) -> CleoResult<bool>;

    async fn count(&self) -> CleoResult<usize>;

    async fn count_by_status(&self, status: TimeSlotStatus) -> CleoResult<usize>;

    async fn with_details(&self) -> CleoResult<Vec<TimeSlotWithDetails>>;

    /// Slots starting within `[start, end]` with their references resolved
    async fn with_details_for_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<TimeSlotWithDetails>>;
}

pub(crate) fn resolve_details(tables: &Tables, time_slot: TimeSlot) -> CleoResult<TimeSlotWithDetails> {
    Ok(TimeSlotWithDetails {
        client: tables.clients.get(time_slot.client_id)?,
        animal: tables.animals.get(time_slot.animal_id)?,
        service: tables.services.get(time_slot.service_id)?,
        time_slot,
    })
}

pub struct InMemoryTimeSlotRepository {
    tables: Arc<Tables>,
}

impl InMemoryTimeSlotRepository {
    pub fn new(tables: Arc<Tables>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl TimeSlotRepository for InMemoryTimeSlotRepository {
    async fn get_all(&self) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.all()
    }

    async fn get_by_id(&self, id: TimeSlotId) -> CleoResult<Option<TimeSlot>> {
        self.tables.time_slots.get(id)
    }

    async fn get_for_date(&self, date: NaiveDate) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.filter(|s| s.day() == date)
    }

    async fn get_for_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<TimeSlot>> {
        self.tables
            .time_slots
            .filter(|s| s.start_date_time >= start && s.start_date_time <= end)
    }

    async fn get_for_client(&self, client_id: ClientId) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.filter(|s| s.client_id == client_id)
    }

    async fn get_for_animal(&self, animal_id: AnimalId) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.filter(|s| s.animal_id == animal_id)
    }

    async fn get_for_service(&self, service_id: ServiceId) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.filter(|s| s.service_id == service_id)
    }

    async fn get_by_status(&self, status: TimeSlotStatus) -> CleoResult<Vec<TimeSlot>> {
        self.tables.time_slots.filter(|s| s.status == status)
    }

    async fn get_upcoming(&self, now: DateTime<Utc>) -> CleoResult<Vec<TimeSlot>> {
        let mut slots = self.tables.time_slots.filter(|s| s.start_date_time > now)?;
        slots.sort_by_key(|s| s.start_date_time);
        Ok(slots)
    }

    async fn get_past(&self, now: DateTime<Utc>) -> CleoResult<Vec<TimeSlot>> {
        let mut slots = self.tables.time_slots.filter(|s| s.start_date_time < now)?;
        slots.sort_by(|a, b| b.start_date_time.cmp(&a.start_date_time));
        Ok(slots)
    }

    async fn has_conflict(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<TimeSlotId>,
    ) -> CleoResult<bool> {
        self.tables.time_slots.any(|s| {
            Some(s.id) != exclude
                && !matches!(s.status, TimeSlotStatus::Cancelled | TimeSlotStatus::NoShow)
                && s.overlaps(start, end)
        })
    }

    async fn insert(&self, time_slot: TimeSlot) -> CleoResult<TimeSlotId> {
        self.tables.time_slots.insert(time_slot)
    }

    async fn update(&self, time_slot: TimeSlot) -> CleoResult<bool> {
        self.tables.time_slots.update(time_slot)
    }

    async fn delete(&self, id: TimeSlotId) -> CleoResult<bool> {
        self.tables.time_slots.delete(id)
    }

    async fn update_status(&self, id: TimeSlotId, status: TimeSlotStatus) -> CleoResult<bool> {
        self.tables.time_slots.modify(id, |s| s.set_status(status))
    }

    async fn count(&self) -> CleoResult<usize> {
        self.tables.time_slots.count()
    }

    async fn count_by_status(&self, status: TimeSlotStatus) -> CleoResult<usize> {
        self.tables.time_slots.count_where(|s| s.status == status)
    }

    async fn with_details(&self) -> CleoResult<Vec<TimeSlotWithDetails>> {
        self.tables
            .time_slots
            .all()?
            .into_iter()
            .map(|s| resolve_details(&self.tables, s))
            .collect()
    }

    async fn with_details_for_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CleoResult<Vec<TimeSlotWithDetails>> {
        let mut slots = self.get_for_date_range(start, end).await?;
        slots.sort_by_key(|s| s.start_date_time);
        tracing::debug!(
            from = %timestamp::day_of(start),
            to = %timestamp::day_of(end),
            count = slots.len(),
            "time slots in range"
        );
        slots
            .into_iter()
            .map(|s| resolve_details(&self.tables, s))
            .collect()
    }
}
