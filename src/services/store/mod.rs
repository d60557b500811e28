//! Event persistence behind a single CRUD contract.
//!
//! A session picks its store once, when it starts: [`LocalStore`] keeps
//! events in memory (optionally mirrored to a JSON file) for offline use,
//! [`RemoteStore`] writes them to the shared SQLite database.

mod local;
mod remote;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::AppConfig;
use crate::models::event::{Event, EventPatch};

pub use local::LocalStore;
pub use remote::RemoteStore;

/// CRUD operations every event store provides.
///
/// Stores validate what they write: an empty title or an end before the
/// start is rejected. Ids are assigned by the store on insert.
#[cfg_attr(test, mockall::automock)]
pub trait EventStore {
    /// Insert a new row and return it with its assigned id.
    fn insert(&mut self, event: Event) -> Result<Event>;

    /// Apply `patch` to the row `id` and return the updated row.
    fn update(&mut self, id: &str, patch: &EventPatch) -> Result<Event>;

    fn delete(&mut self, id: &str) -> Result<()>;

    /// Every row of a calendar, ordered by start time.
    fn select(&self, calendar_id: &str) -> Result<Vec<Event>>;
}

/// The store chosen for a session.
pub enum SessionStore {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl SessionStore {
    /// Open the store described by `config`.
    pub fn open(config: &AppConfig) -> Result<Self> {
        if config.offline {
            let store = match config.local_snapshot_path.as_ref() {
                Some(path) => LocalStore::load(PathBuf::from(path))?,
                None => LocalStore::with_sample_events(&config.calendar_id),
            };
            log::info!("Using local event store ({} events)", store.len());
            return Ok(Self::Local(store));
        }

        let path = config.resolve_database_path()?;
        let store = RemoteStore::open(&path.to_string_lossy())?;
        log::info!("Using shared event store at {}", path.display());
        Ok(Self::Remote(store))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    fn inner(&self) -> &dyn EventStore {
        match self {
            Self::Local(store) => store,
            Self::Remote(store) => store,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn EventStore {
        match self {
            Self::Local(store) => store,
            Self::Remote(store) => store,
        }
    }
}

impl EventStore for SessionStore {
    fn insert(&mut self, event: Event) -> Result<Event> {
        self.inner_mut().insert(event)
    }

    fn update(&mut self, id: &str, patch: &EventPatch) -> Result<Event> {
        self.inner_mut().update(id, patch)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.inner_mut().delete(id)
    }

    fn select(&self, calendar_id: &str) -> Result<Vec<Event>> {
        self.inner().select(calendar_id)
    }
}
