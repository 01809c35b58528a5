//! Display formatting for terminal output
//!
//! Listings are rendered as tables; the dashboard as an indented report.

pub mod client;
pub mod dashboard;
pub mod planning;
pub mod search;
pub mod service;

pub use client::{format_animal_list, format_client_list};
pub use dashboard::format_dashboard;
pub use planning::format_planning;
pub use search::format_search_results;
pub use service::format_service_list;
