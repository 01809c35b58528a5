//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time. Every ID is a random UUID whose string form is
//! the canonical lower-case hyphenated encoding, and parsing rejects anything
//! else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CleoError;

/// Check that `s` is a canonical lower-case hyphenated UUID
/// (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
pub fn is_canonical_uuid(s: &str) -> bool {
    s.len() == 36
        && s.char_indices().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => c == '-',
            _ => matches!(c, '0'..='9' | 'a'..='f'),
        })
}

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from its canonical string form
            pub fn parse(s: &str) -> Result<Self, CleoError> {
                if !is_canonical_uuid(s) {
                    return Err(CleoError::Validation(format!("Invalid UUID format: {}", s)));
                }
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| CleoError::Validation(format!("Invalid UUID format: {} ({})", s, e)))
            }

            /// Short form for tables, e.g. `cli-550e8400`
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = CleoError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl FromStr for $name {
            type Err = CleoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s.trim())
            }
        }
    };
}

define_id!(ClientId, "cli-");
define_id!(AnimalId, "ani-");
define_id!(ServiceId, "srv-");
define_id!(PrestationId, "pre-");
define_id!(TimeSlotId, "slt-");
