//! CSV listings
//!
//! One spreadsheet-friendly listing per entity type, built from a snapshot.
//! Prestation and time slot rows carry the resolved client, animal and
//! service names next to the ids.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{CleoError, CleoResult};
use crate::export::json::AppDataExport;
use crate::models::{AnimalId, ClientId, Money, ServiceId};

/// Entity type of a CSV listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvEntity {
    Clients,
    Animals,
    Services,
    Prestations,
    TimeSlots,
}

fn amount(m: Money) -> String {
    format!("{:.2}", m.cents() as f64 / 100.0)
}

fn csv_err(e: csv::Error) -> CleoError {
    CleoError::Export(e.to_string())
}

struct Names {
    clients: HashMap<ClientId, String>,
    animals: HashMap<AnimalId, String>,
    services: HashMap<ServiceId, String>,
}

impl Names {
    fn from_export(export: &AppDataExport) -> Self {
        Self {
            clients: export.clients.iter().map(|c| (c.id, c.full_name())).collect(),
            animals: export.animals.iter().map(|a| (a.id, a.name.clone())).collect(),
            services: export.services.iter().map(|s| (s.id, s.name.clone())).collect(),
        }
    }

    fn client(&self, id: &ClientId) -> &str {
        self.clients.get(id).map(String::as_str).unwrap_or("Unknown")
    }

    fn animal(&self, id: &AnimalId) -> &str {
        self.animals.get(id).map(String::as_str).unwrap_or("Unknown")
    }

    fn service(&self, id: &ServiceId) -> &str {
        self.services.get(id).map(String::as_str).unwrap_or("Unknown")
    }
}

/// Write the listing for `entity`, returning the number of data rows
pub fn export_csv<W: Write>(
    export: &AppDataExport,
    entity: CsvEntity,
    writer: W,
) -> CleoResult<usize> {
    let mut out = csv::Writer::from_writer(writer);
    let names = Names::from_export(export);

    let rows = match entity {
        CsvEntity::Clients => {
            out.write_record([
                "ID", "First Name", "Last Name", "Email", "Phone", "Address", "Postal Code",
                "City", "Active", "Notes",
            ])
            .map_err(csv_err)?;
            for c in &export.clients {
                out.write_record([
                    c.id.to_string(),
                    c.first_name.clone(),
                    c.last_name.clone(),
                    c.email.clone(),
                    c.phone.clone(),
                    c.address.clone(),
                    c.postal_code.clone(),
                    c.city.clone(),
                    c.is_active.to_string(),
                    c.notes.clone(),
                ])
                .map_err(csv_err)?;
            }
            export.clients.len()
        }
        CsvEntity::Animals => {
            out.write_record([
                "ID", "Name", "Species", "Breed", "Weight (kg)", "Color", "Owner", "Active",
                "Notes",
            ])
            .map_err(csv_err)?;
            for a in &export.animals {
                let owner = a
                    .client_id
                    .map(|id| names.client(&id).to_string())
                    .unwrap_or_default();
                out.write_record([
                    a.id.to_string(),
                    a.name.clone(),
                    a.species.id().to_string(),
                    a.breed.clone(),
                    format!("{:.1}", a.weight),
                    a.color.clone(),
                    owner,
                    a.is_active.to_string(),
                    a.notes.clone(),
                ])
                .map_err(csv_err)?;
            }
            export.animals.len()
        }
        CsvEntity::Services => {
            out.write_record(["ID", "Name", "Description", "Duration (min)", "Price", "Active"])
                .map_err(csv_err)?;
            for s in &export.services {
                out.write_record([
                    s.id.to_string(),
                    s.name.clone(),
                    s.description.clone(),
                    s.duration_minutes.to_string(),
                    amount(s.price),
                    s.is_active.to_string(),
                ])
                .map_err(csv_err)?;
            }
            export.services.len()
        }
        CsvEntity::Prestations => {
            out.write_record([
                "ID", "Start", "End", "Client", "Animal", "Service", "Price", "Status", "Notes",
            ])
            .map_err(csv_err)?;
            for p in &export.prestations {
                out.write_record([
                    p.id.to_string(),
                    p.start_date.to_rfc3339(),
                    p.end_date.to_rfc3339(),
                    names.client(&p.client_id).to_string(),
                    names.animal(&p.animal_id).to_string(),
                    names.service(&p.service_id).to_string(),
                    amount(p.price),
                    p.status.name().to_string(),
                    p.notes.clone(),
                ])
                .map_err(csv_err)?;
            }
            export.prestations.len()
        }
        CsvEntity::TimeSlots => {
            out.write_record([
                "ID", "Start", "End", "Client", "Animal", "Service", "Status", "Notes",
            ])
            .map_err(csv_err)?;
            for t in &export.time_slots {
                out.write_record([
                    t.id.to_string(),
                    t.start_date_time.to_rfc3339(),
                    t.end_date_time.to_rfc3339(),
                    names.client(&t.client_id).to_string(),
                    names.animal(&t.animal_id).to_string(),
                    names.service(&t.service_id).to_string(),
                    format!("{:?}", t.status),
                    t.notes.clone(),
                ])
                .map_err(csv_err)?;
            }
            export.time_slots.len()
        }
    };

    out.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{timestamp, Animal, Client, Prestation, Service, Species};

    #[test]
    fn test_prestation_rows_resolve_names() {
        let client = Client::new("Marie", "Dupont");
        let animal = Animal::owned_by("Buddy", Species::Dog, client.id);
        let service = Service::new("Promenade", 30, Money::from_euros(15));
        let now = timestamp::now();
        let mut prestation =
            Prestation::new(client.id, animal.id, service.id, now, now, service.price);
        prestation.notes = "Clé, sous le paillasson".into();
        let orphan = Prestation::new(
            ClientId::new(),
            animal.id,
            service.id,
            now,
            now,
            Money::from_cents(999),
        );
        let export = AppDataExport::new(
            vec![client],
            vec![animal],
            vec![service],
            vec![prestation, orphan],
            vec![],
        );

        let mut out = Vec::new();
        let rows = export_csv(&export, CsvEntity::Prestations, &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("ID,Start,End,Client"));
        assert!(lines[1].contains("Marie Dupont,Buddy,Promenade,15.00,PLANNED"));
        // notes containing a comma are quoted
        assert!(lines[1].ends_with("\"Clé, sous le paillasson\""));
        assert!(lines[2].contains("Unknown,Buddy,Promenade,9.99"));
    }

    #[test]
    fn test_services_listing() {
        let export = AppDataExport::new(
            vec![],
            vec![],
            vec![Service::new("Toilettage", 90, Money::from_euros(45))],
            vec![],
            vec![],
        );
        let mut out = Vec::new();
        export_csv(&export, CsvEntity::Services, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(",Toilettage,,90,45.00,true"));
    }
}
