//! Sample data loader
//!
//! Builds the demonstration clients, animals, services, prestations and
//! time slots relative to a reference day, so each process or test gets its
//! own fresh copy.

use chrono::{Duration, NaiveDate};

use crate::error::CleoResult;
use crate::models::{
    timestamp, Animal, Client, Money, Prestation, PrestationStatus, Service, Species, TimeSlot,
};

use super::table::Tables;

/// Seed configuration
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Load the sample data set; an empty store otherwise
    pub sample_data: bool,

    /// Day the sample time slots and prestations are placed around
    pub today: NaiveDate,
}

impl SeedConfig {
    /// Sample data placed around the current local day
    pub fn sample() -> Self {
        Self {
            sample_data: true,
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn empty() -> Self {
        Self {
            sample_data: false,
            today: chrono::Local::now().date_naive(),
        }
    }

    pub fn sample_on(today: NaiveDate) -> Self {
        Self {
            sample_data: true,
            today,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self::sample()
    }
}

/// The sample records, in insertion order
pub struct SeedData {
    pub clients: Vec<Client>,
    pub animals: Vec<Animal>,
    pub services: Vec<Service>,
    pub prestations: Vec<Prestation>,
    pub time_slots: Vec<TimeSlot>,
}

fn client(
    first: &str,
    last: &str,
    email: &str,
    phone: &str,
    address: &str,
    postal_code: &str,
    notes: &str,
) -> Client {
    let mut c = Client::new(first, last);
    c.email = email.into();
    c.phone = phone.into();
    c.address = address.into();
    c.postal_code = postal_code.into();
    c.city = "Paris".into();
    c.notes = notes.into();
    c
}

fn animal(
    name: &str,
    species: Species,
    breed: &str,
    owner: &Client,
    age_years: i64,
    weight: f64,
    notes: &str,
) -> Animal {
    let mut a = Animal::owned_by(name, species, owner.id);
    a.breed = breed.into();
    a.birth_date = timestamp::now() - Duration::days(age_years * 365);
    a.weight = weight;
    a.notes = notes.into();
    a
}

fn slot(
    owner: &Client,
    pet: &Animal,
    service: &Service,
    day: NaiveDate,
    hour: u32,
    notes: &str,
) -> TimeSlot {
    let start = timestamp::at(day, hour, 0);
    let mut s = TimeSlot::new(
        owner.id,
        pet.id,
        service.id,
        start,
        start + Duration::minutes(service.duration_minutes as i64),
    );
    s.notes = notes.into();
    s
}

fn prestation(
    owner: &Client,
    pet: &Animal,
    service: &Service,
    day: NaiveDate,
    hour: u32,
    status: PrestationStatus,
    notes: &str,
) -> Prestation {
    let start = timestamp::at(day, hour, 0);
    let mut p = Prestation::new(
        owner.id,
        pet.id,
        service.id,
        start,
        start + Duration::minutes(service.duration_minutes as i64),
        service.price,
    );
    p.status = status;
    p.notes = notes.into();
    p
}

/// Build the sample data set around `today`
pub fn sample_data(today: NaiveDate) -> SeedData {
    let marie = client(
        "Marie",
        "Dupont",
        "marie.dupont@email.com",
        "0123456789",
        "123 Rue de la Paix",
        "75001",
        "Client fidèle",
    );
    let jean = client(
        "Jean",
        "Martin",
        "jean.martin@email.com",
        "0987654321",
        "456 Avenue des Champs",
        "75008",
        "Nouveau client",
    );

    let buddy = animal("Buddy", Species::Dog, "Golden Retriever", &marie, 3, 25.5, "Chien très sociable");
    let misty = animal("Misty", Species::Cat, "Persan", &marie, 2, 4.2, "Chat calme et affectueux");
    let rex = animal("Rex", Species::Dog, "Berger Allemand", &jean, 4, 30.0, "Chien de garde");

    let walk = Service::new("Promenade", 30, Money::from_euros(15))
        .with_description("Promenade de 30 minutes");
    let home = Service::new("Garde à domicile", 120, Money::from_euros(25))
        .with_description("Garde de 2 heures");
    let grooming = Service::new("Toilettage", 90, Money::from_euros(45))
        .with_description("Toilettage complet");

    let tomorrow = today + Duration::days(1);
    let time_slots = vec![
        slot(&marie, &buddy, &walk, today, 9, "Promenade matinale"),
        slot(&marie, &misty, &grooming, today, 14, "Toilettage complet"),
        slot(&jean, &rex, &home, today, 16, "Garde à domicile"),
        slot(&marie, &buddy, &walk, tomorrow, 10, "Promenade quotidienne"),
    ];

    let prestations = vec![
        prestation(
            &marie,
            &buddy,
            &walk,
            today - Duration::days(2),
            9,
            PrestationStatus::Completed,
            "Promenade au parc",
        ),
        prestation(
            &marie,
            &misty,
            &grooming,
            today - Duration::days(1),
            14,
            PrestationStatus::Completed,
            "",
        ),
        prestation(
            &jean,
            &rex,
            &home,
            today + Duration::days(2),
            16,
            PrestationStatus::Planned,
            "Clés chez le gardien",
        ),
    ];

    SeedData {
        clients: vec![marie, jean],
        animals: vec![buddy, misty, rex],
        services: vec![walk, home, grooming],
        prestations,
        time_slots,
    }
}

/// Load the configured data set into `tables`
pub fn seed(tables: &Tables, config: &SeedConfig) -> CleoResult<()> {
    if !config.sample_data {
        return Ok(());
    }

    let data = sample_data(config.today);
    tracing::debug!(
        clients = data.clients.len(),
        time_slots = data.time_slots.len(),
        today = %config.today,
        "seeding sample data"
    );
    tables.clients.replace_all(data.clients)?;
    tables.animals.replace_all(data.animals)?;
    tables.services.replace_all(data.services)?;
    tables.prestations.replace_all(data.prestations)?;
    tables.time_slots.replace_all(data.time_slots)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let data = sample_data(today);

        assert_eq!(data.clients.len(), 2);
        assert_eq!(data.animals.len(), 3);
        assert_eq!(data.services.len(), 3);
        assert_eq!(data.time_slots.len(), 4);

        let today_slots = data.time_slots.iter().filter(|s| s.day() == today).count();
        assert_eq!(today_slots, 3);

        // every animal belongs to a seeded client
        assert!(data
            .animals
            .iter()
            .all(|a| data.clients.iter().any(|c| Some(c.id) == a.client_id)));

        // slot length follows the service duration
        let grooming = &data.time_slots[1];
        assert_eq!(
            (grooming.end_date_time - grooming.start_date_time).num_minutes(),
            90
        );
    }

    #[test]
    fn test_ids_differ_between_loads() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let a = sample_data(today);
        let b = sample_data(today);
        assert_ne!(a.clients[0].id, b.clients[0].id);
    }

    #[test]
    fn test_empty_config_seeds_nothing() {
        let tables = Tables::new(false);
        seed(&tables, &SeedConfig::empty()).unwrap();
        assert_eq!(tables.clients.count().unwrap(), 0);
    }
}
