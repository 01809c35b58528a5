//! Dashboard display formatting
//!
//! Headline figures first, then the recent and upcoming prestations and the
//! client and service rankings.

use crate::models::{DateRange, Money};
use crate::viewmodel::dashboard::DashboardData;

/// Format the dashboard for `range`, amounts shown with `symbol`
pub fn format_dashboard(data: &DashboardData, range: DateRange, symbol: &str) -> String {
    let stats = &data.statistics;
    let money = |m: Money| m.format_with_symbol(symbol);

    let mut output = String::new();
    output.push_str(&format!("Dashboard ({})\n", range));
    output.push_str(&format!(
        "  Clients: {}  Animals: {}  Services: {}  Prestations: {}\n\n",
        data.total_clients, data.total_animals, data.total_services, data.total_prestations
    ));

    output.push_str("Period\n");
    output.push_str(&format!("  Prestations:     {}\n", stats.total_prestations));
    output.push_str(&format!("  Completed:       {}\n", stats.completed_prestations));
    output.push_str(&format!("  Pending:         {}\n", stats.pending_prestations));
    output.push_str(&format!("  Cancelled:       {}\n", stats.cancelled_prestations));
    output.push_str(&format!("  Revenue:         {}\n", money(stats.total_revenue)));
    output.push_str(&format!("  Average:         {}\n", money(stats.average_revenue)));
    output.push_str(&format!(
        "  Completion rate: {:.0}%\n",
        stats.completion_rate * 100.0
    ));

    if !data.upcoming_prestations.is_empty() {
        output.push_str("\nUpcoming\n");
        for p in &data.upcoming_prestations {
            output.push_str(&format!(
                "  {}  {}  {}\n",
                p.start_date.format("%Y-%m-%d %H:%M"),
                money(p.price),
                p.status
            ));
        }
    }

    if !data.recent_prestations.is_empty() {
        output.push_str("\nRecent\n");
        for p in &data.recent_prestations {
            output.push_str(&format!(
                "  {}  {}  {}\n",
                p.start_date.format("%Y-%m-%d %H:%M"),
                money(p.price),
                p.status
            ));
        }
    }

    let clients: Vec<_> = data
        .top_clients
        .iter()
        .filter(|c| c.prestation_count > 0)
        .collect();
    if !clients.is_empty() {
        output.push_str("\nTop clients\n");
        for c in clients {
            output.push_str(&format!(
                "  {:<24} {:>3} prestation(s)  {}\n",
                c.client.full_name(),
                c.prestation_count,
                money(c.total_revenue)
            ));
        }
    }

    let services: Vec<_> = data.top_services.iter().filter(|s| s.usage_count > 0).collect();
    if !services.is_empty() {
        output.push_str("\nTop services\n");
        for s in services {
            output.push_str(&format!(
                "  {:<24} {:>3} use(s)  {}\n",
                s.service.name,
                s.usage_count,
                money(s.total_revenue)
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodel::dashboard::DashboardStatistics;

    #[test]
    fn test_format_headline_figures() {
        let data = DashboardData {
            statistics: DashboardStatistics {
                total_prestations: 2,
                completed_prestations: 1,
                total_revenue: Money::from_euros(15),
                average_revenue: Money::from_euros(15),
                completion_rate: 0.5,
                ..Default::default()
            },
            total_clients: 2,
            ..Default::default()
        };

        let output = format_dashboard(&data, DateRange::ThisMonth, "€");
        assert!(output.contains("Clients: 2"));
        assert!(output.contains("Revenue:         15.00 €"));
        assert!(output.contains("Completion rate: 50%"));
        assert!(!output.contains("Top clients"));
    }
}
