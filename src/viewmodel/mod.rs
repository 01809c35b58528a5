//! View-models for CleoPattes
//!
//! Each view-model owns its observable state in `tokio::sync::watch`
//! channels and reacts to an event enum. Mutations are optimistic: the new
//! collection is published before the repository call is awaited, and the
//! prior snapshot is restored when the repository rejects the change.

pub mod animal;
pub mod client;
pub mod dashboard;
pub mod planning;
pub mod prestation;
pub mod search;
pub mod service;
pub mod settings;

use std::future::Future;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{CleoError, CleoResult};
use crate::storage::Record;

pub use animal::{AnimalEvent, AnimalState, AnimalViewModel};
pub use client::{ClientEvent, ClientState, ClientViewModel};
pub use dashboard::{DashboardEvent, DashboardState, DashboardViewModel};
pub use planning::{PlanningEvent, PlanningState, PlanningViewModel};
pub use prestation::{PrestationEvent, PrestationState, PrestationViewModel};
pub use search::{SearchEvent, SearchState, SearchViewModel};
pub use service::{ServiceEvent, ServiceState, ServiceViewModel};
pub use settings::{SettingsEvent, SettingsState, SettingsViewModel};

/// Message published when an error has no text of its own
pub const GENERIC_ERROR: &str = "An error occurred";

fn error_message(error: &CleoError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR.to_string()
    } else {
        message
    }
}

/// Observable state of a view-model plus its loading flag and error message
pub struct Store<S> {
    state: watch::Sender<S>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
}

impl<S: Send + Sync> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: watch::channel(initial).0,
            loading: watch::channel(false).0,
            error: watch::channel(None).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Current state
    pub fn get(&self) -> S
    where
        S: Clone,
    {
        self.state.borrow().clone()
    }

    /// Read from the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Modify the state in place and notify subscribers
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.state.send_modify(f);
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.error.send_replace(None);
    }

    /// Run `work` with the loading flag raised
    ///
    /// The previous error is cleared first. A failure publishes its message;
    /// the loading flag is lowered whatever the outcome.
    pub async fn run<F>(&self, work: F)
    where
        F: Future<Output = CleoResult<()>> + Send,
    {
        self.loading.send_replace(true);
        self.error.send_replace(None);
        if let Err(e) = work.await {
            tracing::warn!(error = %e, "view-model task failed");
            self.error.send_replace(Some(error_message(&e)));
        }
        self.loading.send_replace(false);
    }
}

/// State holding a collection that optimistic mutations work on
pub trait ListState<T> {
    fn items_mut(&mut self) -> &mut Vec<T>;

    /// Recompute derived views after the collection changed
    fn refresh(&mut self);
}

impl<S: Send + Sync> Store<S> {
    /// Append `record`, then replace its id with the one `insert` returns
    ///
    /// The record is removed again if the insert fails.
    pub(crate) async fn add_optimistic<T, F>(&self, record: T, insert: F)
    where
        S: ListState<T>,
        T: Record,
        F: Future<Output = CleoResult<T::Id>> + Send,
    {
        let provisional = record.record_id();
        self.update(|s| {
            s.items_mut().push(record);
            s.refresh();
        });

        self.run(async move {
            match insert.await {
                Ok(id) => {
                    self.update(|s| {
                        if let Some(r) = s
                            .items_mut()
                            .iter_mut()
                            .rev()
                            .find(|r| r.record_id() == provisional)
                        {
                            r.set_record_id(id);
                        }
                        s.refresh();
                    });
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(id = %provisional, "insert failed, removing record");
                    // only the pushed copy goes, an existing record with the same id stays
                    self.update(|s| {
                        let items = s.items_mut();
                        if let Some(index) =
                            items.iter().rposition(|r| r.record_id() == provisional)
                        {
                            items.remove(index);
                        }
                        s.refresh();
                    });
                    Err(e)
                }
            }
        })
        .await;
    }

    /// Replace the record with the same id, restoring it unless `update` returns `Ok(true)`
    pub(crate) async fn update_optimistic<T, F>(&self, record: T, update: F)
    where
        S: ListState<T>,
        T: Record,
        F: Future<Output = CleoResult<bool>> + Send,
    {
        let id = record.record_id();
        let mut previous = None;
        self.update(|s| {
            if let Some(slot) = s.items_mut().iter_mut().find(|r| r.record_id() == id) {
                previous = Some(std::mem::replace(slot, record));
            }
            s.refresh();
        });

        self.run(async move {
            let result = update.await;
            if !matches!(result, Ok(true)) {
                if let Some(previous) = previous {
                    tracing::warn!(%id, "update rejected, restoring previous record");
                    self.update(|s| {
                        if let Some(slot) = s.items_mut().iter_mut().find(|r| r.record_id() == id)
                        {
                            *slot = previous;
                        }
                        s.refresh();
                    });
                }
            }
            result.map(|_| ())
        })
        .await;
    }

    /// Remove the record `id`, re-inserting it at its position unless `delete` returns `Ok(true)`
    pub(crate) async fn delete_optimistic<T, F>(&self, id: T::Id, delete: F)
    where
        S: ListState<T>,
        T: Record,
        F: Future<Output = CleoResult<bool>> + Send,
    {
        let mut removed = None;
        self.update(|s| {
            let items = s.items_mut();
            if let Some(index) = items.iter().position(|r| r.record_id() == id) {
                removed = Some((index, items.remove(index)));
            }
            s.refresh();
        });

        self.run(async move {
            let result = delete.await;
            if !matches!(result, Ok(true)) {
                if let Some((index, record)) = removed {
                    tracing::warn!(%id, "delete rejected, restoring record");
                    self.update(|s| {
                        let items = s.items_mut();
                        let index = index.min(items.len());
                        items.insert(index, record);
                        s.refresh();
                    });
                }
            }
            result.map(|_| ())
        })
        .await;
    }
}

/// A view-model driven by events
#[async_trait]
pub trait ViewModel: Send + Sync {
    type State: Clone + Send + Sync;
    type Event: Send + 'static;

    fn store(&self) -> &Store<Self::State>;

    /// React to one event; returns once its repository work has completed
    async fn handle_event(&self, event: Self::Event);

    fn state(&self) -> Self::State {
        self.store().get()
    }

    fn subscribe(&self) -> watch::Receiver<Self::State> {
        self.store().subscribe()
    }

    fn is_loading(&self) -> bool {
        self.store().is_loading()
    }

    fn error_message(&self) -> Option<String> {
        self.store().error()
    }
}
