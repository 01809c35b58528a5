//! Service model
//!
//! A bookable service offering (walk, home visit, grooming...).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::default_true;
use super::ids::ServiceId;
use super::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub duration_minutes: u32,

    #[serde(default)]
    pub price: Money,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Service {
    pub fn new(name: impl Into<String>, duration_minutes: u32, price: Money) -> Self {
        Self {
            id: ServiceId::new(),
            name: name.into(),
            description: String::new(),
            duration_minutes,
            price,
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive match over name and description
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }

    /// Duration formatted as `1h30` / `45min`
    pub fn duration_display(&self) -> String {
        let hours = self.duration_minutes / 60;
        let minutes = self.duration_minutes % 60;
        match (hours, minutes) {
            (0, m) => format!("{}min", m),
            (h, 0) => format!("{}h", h),
            (h, m) => format!("{}h{:02}", h, m),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}
