//! CleoPattes - pet-sitting business manager
//!
//! This library provides the core of the CleoPattes application: the domain
//! records of a pet-sitting business, an async repository layer, and the
//! view-models that turn user events into observable state.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and persisted user settings
//! - `error`: Custom error types
//! - `models`: Clients, animals, services, prestations and time slots
//! - `storage`: Async repository contracts and the in-memory store
//! - `viewmodel`: Event-driven state for each screen
//! - `export`: JSON, YAML and CSV snapshots
//! - `cli` and `display`: The command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cleopattes::storage::{MockAppRepository, SeedConfig};
//! use cleopattes::viewmodel::{ClientEvent, ClientViewModel, ViewModel};
//!
//! let repo = Arc::new(MockAppRepository::new(&SeedConfig::sample())?);
//! let vm = ClientViewModel::new(repo);
//! vm.handle_event(ClientEvent::LoadClients).await;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod storage;
pub mod viewmodel;

pub use error::{CleoError, CleoResult};
