//! Time slot model
//!
//! A scheduled appointment in the planning calendar.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::animal::Animal;
use super::client::Client;
use super::ids::{AnimalId, ClientId, ServiceId, TimeSlotId};
use super::service::Service;
use super::timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSlotStatus {
    /// Not started yet
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    /// The client didn't show up
    NoShow,
}

impl TimeSlotStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "no_show" | "noshow" => Some(Self::NoShow),
            _ => None,
        }
    }
}

impl fmt::Display for TimeSlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "Scheduled"),
            Self::InProgress => write!(f, "In progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::NoShow => write!(f, "No show"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: TimeSlotId,
    pub client_id: ClientId,
    pub animal_id: AnimalId,
    pub service_id: ServiceId,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_date_time: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_date_time: DateTime<Utc>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub status: TimeSlotStatus,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(
        client_id: ClientId,
        animal_id: AnimalId,
        service_id: ServiceId,
        start_date_time: DateTime<Utc>,
        end_date_time: DateTime<Utc>,
    ) -> Self {
        let now = timestamp::now();
        Self {
            id: TimeSlotId::new(),
            client_id,
            animal_id,
            service_id,
            start_date_time,
            end_date_time,
            notes: String::new(),
            status: TimeSlotStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the status and bump `updated_at`
    pub fn set_status(&mut self, status: TimeSlotStatus) {
        self.status = status;
        self.updated_at = timestamp::now();
    }

    pub fn day(&self) -> NaiveDate {
        timestamp::day_of(self.start_date_time)
    }

    /// Whether `[start, end]` overlaps this slot (touching edges don't count)
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_date_time < end && start < self.end_date_time
    }
}

/// A time slot with its references resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotWithDetails {
    pub time_slot: TimeSlot,
    pub client: Option<Client>,
    pub animal: Option<Animal>,
    pub service: Option<Service>,
}

impl TimeSlotWithDetails {
    pub fn client_name(&self) -> String {
        self.client
            .as_ref()
            .map(Client::full_name)
            .unwrap_or_else(|| "Unknown client".to_string())
    }

    pub fn animal_name(&self) -> String {
        self.animal
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| "Unknown animal".to_string())
    }

    pub fn service_name(&self) -> String {
        self.service
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown service".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn slot_at(hour: u32, minutes: i64) -> TimeSlot {
        let start = timestamp::at(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), hour, 0);
        TimeSlot::new(
            ClientId::new(),
            AnimalId::new(),
            ServiceId::new(),
            start,
            start + Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_new_slot_is_scheduled() {
        let slot = slot_at(9, 30);
        assert_eq!(slot.status, TimeSlotStatus::Scheduled);
        assert_eq!(slot.created_at, slot.updated_at);
    }

    #[test]
    fn test_overlaps() {
        let slot = slot_at(14, 90);
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert!(slot.overlaps(timestamp::at(day, 15, 0), timestamp::at(day, 16, 0)));
        assert!(!slot.overlaps(timestamp::at(day, 15, 30), timestamp::at(day, 16, 0)));
        assert!(!slot.overlaps(timestamp::at(day, 9, 0), timestamp::at(day, 14, 0)));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TimeSlotStatus::parse("no-show"), Some(TimeSlotStatus::NoShow));
        assert_eq!(TimeSlotStatus::parse("Completed"), Some(TimeSlotStatus::Completed));
        assert_eq!(TimeSlotStatus::parse("late"), None);
    }

    #[test]
    fn test_serialization() {
        let mut slot = slot_at(10, 30);
        slot.notes = "Clé chez la voisine".into();
        let json = serde_json::to_string(&slot).unwrap();
        assert!(json.contains("\"status\":\"SCHEDULED\""));
        let deserialized: TimeSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, slot);
    }

    #[test]
    fn test_details_fallback_names() {
        let details = TimeSlotWithDetails {
            time_slot: slot_at(9, 30),
            client: None,
            animal: None,
            service: None,
        };
        assert_eq!(details.client_name(), "Unknown client");
        assert_eq!(details.service_name(), "Unknown service");
    }
}
