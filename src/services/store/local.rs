use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use super::EventStore;
use crate::models::event::{Event, EventPatch};
use crate::utils::date::parse_timestamp;

/// On-disk form of a [`LocalStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct LocalSnapshot {
    events: Vec<Event>,
}

/// In-memory event store for sessions without a shared database.
///
/// When a snapshot path is set, every write goes to that JSON file first.
/// A write the file refuses leaves the in-memory events unchanged.
#[derive(Debug, Default)]
pub struct LocalStore {
    events: Vec<Event>,
    snapshot_path: Option<PathBuf>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three demonstration events shown to signed-out users.
    pub fn with_sample_events(calendar_id: &str) -> Self {
        let samples = [
            ("1", "会議", "2025-10-02T10:00:00", "2025-10-02T11:00:00", false, "#3B82F6"),
            ("2", "ランチ", "2025-10-05T12:00:00", "2025-10-05T13:00:00", false, "#10B981"),
            ("3", "全日イベント", "2025-10-08T00:00:00", "2025-10-08T23:59:59", true, "#F59E0B"),
        ];

        let events = samples
            .iter()
            .filter_map(|(id, title, start, end, all_day, color)| {
                Some(Event {
                    id: Some(id.to_string()),
                    calendar_id: calendar_id.to_string(),
                    title: title.to_string(),
                    start_time: parse_timestamp(start).ok()?,
                    end_time: parse_timestamp(end).ok()?,
                    is_all_day: *all_day,
                    color: color.to_string(),
                    description: None,
                    created_by: None,
                })
            })
            .collect();

        Self {
            events,
            snapshot_path: None,
        }
    }

    /// Load a store from a JSON snapshot. A missing file yields an empty
    /// store that will create the file on its first write.
    pub fn load(path: PathBuf) -> Result<Self> {
        let snapshot = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("failed to read events from {}", path.display()))?;
            serde_json::from_str::<LocalSnapshot>(&data).map_err(|err| map_deser_error(err, &path))?
        } else {
            LocalSnapshot::default()
        };

        log::debug!("Loaded {} events from {}", snapshot.events.len(), path.display());
        Ok(Self {
            events: snapshot.events,
            snapshot_path: Some(path),
        })
    }

    /// Write the current events to the snapshot file, if one is set.
    pub fn save(&self) -> Result<()> {
        self.write_snapshot(&self.events)
    }

    fn write_snapshot(&self, events: &[Event]) -> Result<()> {
        let Some(path) = self.snapshot_path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }

        let snapshot = LocalSnapshot {
            events: events.to_vec(),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, data)
            .with_context(|| format!("failed to write events to {}", path.display()))?;
        Ok(())
    }

    /// Persist `next` and only then make it the current state.
    fn commit(&mut self, next: Vec<Event>) -> Result<()> {
        self.write_snapshot(&next)?;
        self.events = next;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.events
            .iter()
            .position(|event| event.id.as_deref() == Some(id))
            .ok_or_else(|| anyhow!("Event with id {} not found", id))
    }
}

impl EventStore for LocalStore {
    fn insert(&mut self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;

        if event.id.is_none() {
            event.id = Some(uuid::Uuid::new_v4().to_string());
        }
        let mut next = self.events.clone();
        next.push(event.clone());
        self.commit(next)?;
        Ok(event)
    }

    fn update(&mut self, id: &str, patch: &EventPatch) -> Result<Event> {
        let index = self.position(id)?;

        let mut updated = self.events[index].clone();
        updated.apply_patch(patch);
        updated.validate().map_err(|e| anyhow!(e))?;

        let mut next = self.events.clone();
        next[index] = updated.clone();
        self.commit(next)?;
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        let mut next = self.events.clone();
        next.remove(index);
        self.commit(next)
    }

    fn select(&self, calendar_id: &str) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|event| event.calendar_id == calendar_id)
            .cloned()
            .collect();
        events.sort_by_key(|event| event.start_time);
        Ok(events)
    }
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize events from {}",
        path.display()
    ))
}
