//! In-memory record table
//!
//! An ordered `Vec` behind a `RwLock`, shared by every mock repository.
//! Records are replaced by index lookup and removed by id predicate. Writes
//! fail with `ReadOnly` while the shared read-only switch is on.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CleoError, CleoResult};
use crate::models::{
    Animal, AnimalId, Client, ClientId, Prestation, PrestationId, Service, ServiceId, TimeSlot,
    TimeSlotId,
};

/// A record with a typed identifier
pub trait Record: Clone + Send + Sync {
    type Id: Copy + PartialEq + std::fmt::Display + Send + Sync;

    fn record_id(&self) -> Self::Id;

    fn set_record_id(&mut self, id: Self::Id);
}

macro_rules! impl_record {
    ($ty:ty, $id:ty) => {
        impl Record for $ty {
            type Id = $id;

            fn record_id(&self) -> Self::Id {
                self.id
            }

            fn set_record_id(&mut self, id: Self::Id) {
                self.id = id;
            }
        }
    };
}

impl_record!(Client, ClientId);
impl_record!(Animal, AnimalId);
impl_record!(Service, ServiceId);
impl_record!(Prestation, PrestationId);
impl_record!(TimeSlot, TimeSlotId);

/// Shared switch that makes every table refuse writes
#[derive(Debug, Clone, Default)]
pub struct ReadOnlySwitch(Arc<AtomicBool>);

impl ReadOnlySwitch {
    pub fn new(read_only: bool) -> Self {
        Self(Arc::new(AtomicBool::new(read_only)))
    }

    pub fn set(&self, read_only: bool) {
        self.0.store(read_only, Ordering::SeqCst);
    }

    pub fn is_on(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Table<T: Record> {
    name: &'static str,
    rows: RwLock<Vec<T>>,
    read_only: ReadOnlySwitch,
}

impl<T: Record> Table<T> {
    pub fn new(name: &'static str, read_only: ReadOnlySwitch) -> Self {
        Self {
            name,
            rows: RwLock::new(Vec::new()),
            read_only,
        }
    }

    fn read(&self) -> CleoResult<RwLockReadGuard<'_, Vec<T>>> {
        self.rows
            .read()
            .map_err(|e| CleoError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self, action: &str) -> CleoResult<RwLockWriteGuard<'_, Vec<T>>> {
        if self.read_only.is_on() {
            return Err(CleoError::ReadOnly(format!("{} {}", action, self.name)));
        }
        self.rows
            .write()
            .map_err(|e| CleoError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// All records in insertion order
    pub fn all(&self) -> CleoResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    pub fn get(&self, id: T::Id) -> CleoResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.record_id() == id).cloned())
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> CleoResult<Vec<T>> {
        Ok(self.read()?.iter().filter(|r| pred(r)).cloned().collect())
    }

    pub fn any(&self, pred: impl Fn(&T) -> bool) -> CleoResult<bool> {
        Ok(self.read()?.iter().any(pred))
    }

    pub fn count(&self) -> CleoResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> CleoResult<usize> {
        Ok(self.read()?.iter().filter(|r| pred(r)).count())
    }

    /// Append a record and return its id; an id already present is refused
    pub fn insert(&self, record: T) -> CleoResult<T::Id> {
        let id = record.record_id();
        let mut rows = self.write("insert")?;
        if rows.iter().any(|r| r.record_id() == id) {
            return Err(CleoError::Validation(format!(
                "{} already contains id {}",
                self.name, id
            )));
        }
        rows.push(record);
        tracing::debug!(table = self.name, %id, "inserted");
        Ok(id)
    }

    /// Replace the record with the same id; false when absent
    pub fn update(&self, record: T) -> CleoResult<bool> {
        let id = record.record_id();
        let mut rows = self.write("update")?;
        match rows.iter().position(|r| r.record_id() == id) {
            Some(index) => {
                rows[index] = record;
                tracing::debug!(table = self.name, %id, "updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply `f` to the record with `id` in place; false when absent
    pub fn modify(&self, id: T::Id, f: impl FnOnce(&mut T)) -> CleoResult<bool> {
        let mut rows = self.write("update")?;
        match rows.iter_mut().find(|r| r.record_id() == id) {
            Some(record) => {
                f(record);
                tracing::debug!(table = self.name, %id, "modified");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every record with `id`; false when none matched
    pub fn delete(&self, id: T::Id) -> CleoResult<bool> {
        let mut rows = self.write("delete")?;
        let before = rows.len();
        rows.retain(|r| r.record_id() != id);
        let removed = rows.len() != before;
        if removed {
            tracing::debug!(table = self.name, %id, "deleted");
        }
        Ok(removed)
    }

    /// Replace the whole content
    pub fn replace_all(&self, records: Vec<T>) -> CleoResult<()> {
        *self.write("import")? = records;
        Ok(())
    }
}

/// The five entity tables behind one repository, sharing a read-only switch
pub struct Tables {
    pub clients: Table<Client>,
    pub animals: Table<Animal>,
    pub services: Table<Service>,
    pub prestations: Table<Prestation>,
    pub time_slots: Table<TimeSlot>,
    pub read_only: ReadOnlySwitch,
}

impl Tables {
    pub fn new(read_only: bool) -> Self {
        let switch = ReadOnlySwitch::new(read_only);
        Self {
            clients: Table::new("clients", switch.clone()),
            animals: Table::new("animals", switch.clone()),
            services: Table::new("services", switch.clone()),
            prestations: Table::new("prestations", switch.clone()),
            time_slots: Table::new("time slots", switch.clone()),
            read_only: switch,
        }
    }
}
