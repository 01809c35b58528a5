//! Prestation model
//!
//! A booked or completed service instance, billed to a client for one of
//! their animals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::animal::Animal;
use super::client::Client;
use super::ids::{AnimalId, ClientId, PrestationId, ServiceId};
use super::money::Money;
use super::service::Service;
use super::timestamp;

/// Lifecycle of a prestation: PLANNED -> IN_PROGRESS -> COMPLETED, or CANCELLED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrestationStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl PrestationStatus {
    pub const ALL: [PrestationStatus; 4] = [
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Constant name as used in search (`PLANNED`, `IN_PROGRESS`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Planned => "PLANNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "planned" => Some(Self::Planned),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for PrestationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "Planned"),
            Self::InProgress => write!(f, "In progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prestation {
    pub id: PrestationId,
    pub client_id: ClientId,
    pub animal_id: AnimalId,
    pub service_id: ServiceId,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_date: DateTime<Utc>,

    /// Not required to be after `start_date`
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_date: DateTime<Utc>,

    pub price: Money,
    pub status: PrestationStatus,

    #[serde(default)]
    pub notes: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Prestation {
    /// Create a planned prestation
    pub fn new(
        client_id: ClientId,
        animal_id: AnimalId,
        service_id: ServiceId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        price: Money,
    ) -> Self {
        Self {
            id: PrestationId::new(),
            client_id,
            animal_id,
            service_id,
            start_date,
            end_date,
            price,
            status: PrestationStatus::Planned,
            notes: String::new(),
            created_at: timestamp::now(),
        }
    }

    /// UTC calendar day the prestation starts on
    pub fn start_day(&self) -> NaiveDate {
        timestamp::day_of(self.start_date)
    }

    pub fn is_completed(&self) -> bool {
        self.status == PrestationStatus::Completed
    }

    /// Case-insensitive match over notes and status name
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.notes.to_lowercase().contains(&q) || self.status.name().to_lowercase().contains(&q)
    }
}

/// A prestation with its references resolved
///
/// References are not validated, so each side may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct PrestationWithDetails {
    pub prestation: Prestation,
    pub client: Option<Client>,
    pub animal: Option<Animal>,
    pub service: Option<Service>,
}
