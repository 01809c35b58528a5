//! Animal model
//!
//! A pet in the care of the business, optionally owned by a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::client::default_true;
use super::ids::{AnimalId, ClientId};
use super::timestamp;

/// Species of an animal, serialised by its language-independent id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Bird,
    Rodent,
    Reptile,
    #[default]
    Other,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Self::Dog,
        Self::Cat,
        Self::Bird,
        Self::Rodent,
        Self::Reptile,
        Self::Other,
    ];

    /// Language-independent identifier (`dog`, `cat`, ...)
    pub fn id(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Bird => "bird",
            Self::Rodent => "rodent",
            Self::Reptile => "reptile",
            Self::Other => "other",
        }
    }

    /// English display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dog => "Dog",
            Self::Cat => "Cat",
            Self::Bird => "Bird",
            Self::Rodent => "Rodent",
            Self::Reptile => "Reptile",
            Self::Other => "Other",
        }
    }

    /// Parse a species from its id or English name
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|species| species.id() == lower)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An animal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub species: Species,

    #[serde(default)]
    pub breed: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub birth_date: DateTime<Utc>,

    /// Weight in kilograms
    #[serde(default)]
    pub weight: f64,

    #[serde(default)]
    pub color: String,

    /// Owning client; not checked for existence
    #[serde(default)]
    pub client_id: Option<ClientId>,

    #[serde(default)]
    pub notes: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Animal {
    pub fn new(name: impl Into<String>, species: Species) -> Self {
        Self {
            id: AnimalId::new(),
            name: name.into(),
            species,
            breed: String::new(),
            birth_date: timestamp::now(),
            weight: 0.0,
            color: String::new(),
            client_id: None,
            notes: String::new(),
            is_active: true,
        }
    }

    /// Create an animal owned by `client_id`
    pub fn owned_by(name: impl Into<String>, species: Species, client_id: ClientId) -> Self {
        let mut animal = Self::new(name, species);
        animal.client_id = Some(client_id);
        animal
    }

    /// "Name (Species)"
    pub fn full_name(&self) -> String {
        format!("{} ({})", self.name, self.species.name())
    }

    /// Case-insensitive match over name, breed, species id and species name
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.breed.to_lowercase().contains(&q)
            || self.species.id().contains(&q)
            || self.species.name().to_lowercase().contains(&q)
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let animal = Animal::new("Buddy", Species::Dog);
        assert_eq!(animal.full_name(), "Buddy (Dog)");
    }

    #[test]
    fn test_species_parse() {
        assert_eq!(Species::parse("cat"), Some(Species::Cat));
        assert_eq!(Species::parse(" Rodent "), Some(Species::Rodent));
        assert_eq!(Species::parse("dragon"), None);
    }

    #[test]
    fn test_matches_query() {
        let mut animal = Animal::new("Misty", Species::Cat);
        animal.breed = "Persan".into();
        assert!(animal.matches_query("mis"));
        assert!(animal.matches_query("PERS"));
        assert!(animal.matches_query("cat"));
        assert!(!animal.matches_query("dog"));
    }

    #[test]
    fn test_serialization() {
        let owner = ClientId::new();
        let mut animal = Animal::owned_by("Rex", Species::Dog, owner);
        animal.breed = "Berger Allemand".into();
        animal.weight = 30.0;

        let json = serde_json::to_string(&animal).unwrap();
        assert!(json.contains("\"species\":\"dog\""));
        let deserialized: Animal = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, animal);
    }
}
