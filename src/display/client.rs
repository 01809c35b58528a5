//! Client and animal display formatting

use std::collections::HashMap;

use tabled::{settings::Style, Table, Tabled};

use crate::models::{Animal, Client, ClientId};

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Animals")]
    animals: usize,
}

#[derive(Tabled)]
struct AnimalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Breed")]
    breed: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

/// Format clients as a table, with the number of animals each one owns
pub fn format_client_list(clients: &[Client], animals: &[Animal]) -> String {
    if clients.is_empty() {
        return "No clients found.\n".to_string();
    }

    let mut owned: HashMap<ClientId, usize> = HashMap::new();
    for client_id in animals.iter().filter_map(|a| a.client_id) {
        *owned.entry(client_id).or_default() += 1;
    }

    let rows = clients.iter().map(|c| ClientRow {
        id: c.id.to_string(),
        name: c.full_name(),
        email: c.email.clone(),
        phone: c.phone.clone(),
        city: c.city.clone(),
        animals: owned.get(&c.id).copied().unwrap_or(0),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n{} client(s)\n", table, clients.len())
}

/// Format animals as a table with their owner's name
pub fn format_animal_list(animals: &[Animal], clients: &[Client]) -> String {
    if animals.is_empty() {
        return "No animals found.\n".to_string();
    }

    let owners: HashMap<ClientId, String> =
        clients.iter().map(|c| (c.id, c.full_name())).collect();

    let rows = animals.iter().map(|a| AnimalRow {
        id: a.id.to_string(),
        name: a.name.clone(),
        species: a.species.name().to_string(),
        breed: a.breed.clone(),
        owner: a
            .client_id
            .and_then(|id| owners.get(&id).cloned())
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n{} animal(s)\n", table, animals.len())
}
