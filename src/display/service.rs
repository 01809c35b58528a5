//! Service catalogue display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Service;

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Active")]
    active: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

/// Format the service catalogue, amounts shown with `symbol`
pub fn format_service_list(services: &[Service], symbol: &str) -> String {
    if services.is_empty() {
        return "No services found.\n".to_string();
    }

    let rows = services.iter().map(|s| ServiceRow {
        name: s.name.clone(),
        duration: s.duration_display(),
        price: s.price.format_with_symbol(symbol),
        active: if s.is_active { "yes" } else { "no" },
        description: s.description.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_service_list() {
        let services = vec![
            Service::new("Promenade", 30, Money::from_euros(15)),
            Service::new("Toilettage", 90, Money::from_euros(45)).with_description("Toilettage complet"),
        ];

        let output = format_service_list(&services, "€");
        assert!(output.contains("30min"));
        assert!(output.contains("1h30"));
        assert!(output.contains("45.00 €"));
        assert!(output.contains("Toilettage complet"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_service_list(&[], "€").contains("No services found"));
    }
}
