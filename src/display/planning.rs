//! Planning display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::viewmodel::PlanningState;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Animal")]
    animal: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Notes")]
    notes: String,
}

/// Format the visible time slots of a planning window
pub fn format_planning(state: &PlanningState) -> String {
    let (start, end) = state.window();
    let mut output = format!(
        "Planning ({} view): {} to {}\n",
        state.calendar_view,
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    );

    if state.filtered_time_slots.is_empty() {
        output.push_str("No time slots scheduled.\n");
        return output;
    }

    let rows = state.filtered_time_slots.iter().map(|d| {
        let slot = &d.time_slot;
        SlotRow {
            day: slot.start_date_time.format("%Y-%m-%d").to_string(),
            time: format!(
                "{}-{}",
                slot.start_date_time.format("%H:%M"),
                slot.end_date_time.format("%H:%M")
            ),
            client: d.client_name(),
            animal: d.animal_name(),
            service: d.service_name(),
            status: slot.status.to_string(),
            notes: slot.notes.clone(),
        }
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    output.push_str(&format!("{}\n", table));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_window() {
        let state = PlanningState::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let output = format_planning(&state);
        assert!(output.contains("2024-01-15 to 2024-01-15"));
        assert!(output.contains("No time slots scheduled"));
    }
}
