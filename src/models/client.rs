//! Client model
//!
//! A pet owner who books services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClientId;
use super::timestamp;

/// A client of the pet-sitting business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub postal_code: String,

    #[serde(default)]
    pub city: String,

    /// When the client was registered
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub notes: String,

    /// Inactive clients are kept for history but hidden from booking
    #[serde(default = "default_true")]
    pub is_active: bool,
}

pub(crate) fn default_true() -> bool {
    true
}

impl Client {
    /// Create a new active client with empty contact details
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: ClientId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            postal_code: String::new(),
            city: String::new(),
            created_at: timestamp::now(),
            notes: String::new(),
            is_active: true,
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match over name, email and phone
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.first_name.to_lowercase().contains(&q)
            || self.last_name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
            || self.phone.to_lowercase().contains(&q)
    }

    /// Validate the client
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(ClientValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for ClientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = Client::new("Marie", "Dupont");
        assert_eq!(client.full_name(), "Marie Dupont");
        assert!(client.is_active);
        assert!(client.notes.is_empty());
    }

    #[test]
    fn test_matches_query() {
        let mut client = Client::new("Marie", "Dupont");
        client.email = "marie.dupont@email.com".into();
        client.phone = "0123456789".into();

        assert!(client.matches_query("MARIE"));
        assert!(client.matches_query("dup"));
        assert!(client.matches_query("email.com"));
        assert!(client.matches_query("2345"));
        assert!(!client.matches_query("martin"));
    }

    #[test]
    fn test_validation() {
        let mut client = Client::new("", " ");
        assert_eq!(client.validate(), Err(ClientValidationError::EmptyName));

        client.first_name = "Jean".into();
        client.email = "jean.martin".into();
        assert!(matches!(
            client.validate(),
            Err(ClientValidationError::InvalidEmail(_))
        ));

        client.email = "jean.martin@email.com".into();
        assert!(client.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let mut client = Client::new("Jean", "Martin");
        client.city = "Paris".into();
        let json = serde_json::to_string(&client).unwrap();
        let deserialized: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, client);
    }
}
