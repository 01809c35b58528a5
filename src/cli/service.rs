//! Service catalogue command

use std::sync::Arc;

use clap::Args;

use crate::config::Settings;
use crate::display::format_service_list;
use crate::error::{CleoError, CleoResult};
use crate::models::Money;
use crate::storage::AppRepository;
use crate::viewmodel::{ServiceEvent, ServiceViewModel, ViewModel};

use super::published_error;

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Lowest price shown (e.g. "15" or "15.50")
    #[arg(long)]
    pub min_price: Option<String>,

    /// Highest price shown
    #[arg(long)]
    pub max_price: Option<String>,

    /// Only services whose name or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

fn parse_price(flag: &str, value: Option<&str>) -> CleoResult<Option<Money>> {
    value
        .map(|v| {
            Money::parse(v)
                .map_err(|e| CleoError::Validation(format!("Invalid {}: {}", flag, e)))
        })
        .transpose()
}

pub async fn handle_services_command(
    repository: Arc<dyn AppRepository>,
    settings: &Settings,
    args: ServiceArgs,
) -> CleoResult<()> {
    let min = parse_price("--min-price", args.min_price.as_deref())?;
    let max = parse_price("--max-price", args.max_price.as_deref())?;
    let vm = ServiceViewModel::new(repository);

    vm.handle_event(ServiceEvent::LoadServices).await;
    if min.is_some() || max.is_some() {
        vm.handle_event(ServiceEvent::FilterByPriceRange {
            min: min.unwrap_or_else(Money::zero),
            max: max.unwrap_or(Money::from_cents(i64::MAX)),
        })
        .await;
    }
    if let Some(query) = args.search {
        vm.handle_event(ServiceEvent::SearchServices(query)).await;
    }
    published_error(&vm)?;

    print!(
        "{}",
        format_service_list(&vm.state().filtered_services, settings.currency_symbol())
    );
    Ok(())
}
