//! Configuration module for CleoPattes
//!
//! This module provides configuration management including:
//! - path resolution with an environment override
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::CleoPaths;
pub use settings::{BackupFrequency, Settings};
