//! Search result display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::viewmodel::search::SearchResults;

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Result")]
    title: String,
    #[tabled(rename = "Score")]
    score: u32,
}

/// Format ranked results with the per-type counts
pub fn format_search_results(results: &SearchResults) -> String {
    if results.results.is_empty() {
        return format!("No results for '{}'.\n", results.query);
    }

    let term = results.query.trim().to_lowercase();
    let rows = results.results.iter().map(|r| ResultRow {
        kind: r.kind(),
        title: r.title(),
        score: r.relevance_score(&term),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!(
        "{}\n{} result(s): {} client(s), {} animal(s), {} service(s), {} prestation(s)\n",
        table,
        results.total_count,
        results.client_count,
        results.animal_count,
        results.service_count,
        results.prestation_count
    )
}
