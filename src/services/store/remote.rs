use anyhow::{anyhow, Context, Result};
use rusqlite::{self, params, Row};

use super::EventStore;
use crate::models::event::{Event, EventPatch, DEFAULT_EVENT_COLOR};
use crate::services::database::Database;
use crate::utils::date::{format_timestamp, parse_timestamp};

const EVENT_COLUMNS: &str = "id, calendar_id, title, description, start_time, end_time,
                    is_all_day, color, created_by";

/// Event store backed by the shared SQLite database.
pub struct RemoteStore {
    db: Database,
}

impl RemoteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database at `path`, creating the schema if needed.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Retrieve an event by id.
    pub fn get(&self, id: &str) -> Result<Option<Event>> {
        let result = self.db.connection().query_row(
            &format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS),
            [id],
            map_event_row,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl EventStore for RemoteStore {
    fn insert(&mut self, mut event: Event) -> Result<Event> {
        event.validate().map_err(|e| anyhow!(e))?;

        let id = event
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        self.db
            .connection()
            .execute(
                "INSERT INTO events (
                    id, calendar_id, title, description, start_time, end_time,
                    is_all_day, color, created_by
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    event.calendar_id,
                    event.title,
                    event.description,
                    format_timestamp(event.start_time),
                    format_timestamp(event.end_time),
                    event.is_all_day as i32,
                    event.color,
                    event.created_by,
                ],
            )
            .context("Failed to insert event")?;

        log::info!("Inserted event {} into calendar {}", id, event.calendar_id);
        event.id = Some(id);
        Ok(event)
    }

    fn update(&mut self, id: &str, patch: &EventPatch) -> Result<Event> {
        let mut event = self
            .get(id)?
            .ok_or_else(|| anyhow!("Event with id {} not found", id))?;
        event.apply_patch(patch);
        event.validate().map_err(|e| anyhow!(e))?;

        let rows_affected = self
            .db
            .connection()
            .execute(
                "UPDATE events SET
                    title = ?, description = ?, start_time = ?, end_time = ?,
                    is_all_day = ?, color = ?, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                params![
                    event.title,
                    event.description,
                    format_timestamp(event.start_time),
                    format_timestamp(event.end_time),
                    event.is_all_day as i32,
                    event.color,
                    id,
                ],
            )
            .context("Failed to update event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        log::debug!("Updated event {}", id);
        Ok(event)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let rows_affected = self
            .db
            .connection()
            .execute("DELETE FROM events WHERE id = ?", [id])
            .context("Failed to delete event")?;

        if rows_affected == 0 {
            return Err(anyhow!("Event with id {} not found", id));
        }

        log::info!("Deleted event {}", id);
        Ok(())
    }

    fn select(&self, calendar_id: &str) -> Result<Vec<Event>> {
        let mut stmt = self
            .db
            .connection()
            .prepare(&format!(
                "SELECT {} FROM events WHERE calendar_id = ? ORDER BY start_time, id",
                EVENT_COLUMNS
            ))
            .context("Failed to prepare event query")?;

        let events = stmt
            .query_map([calendar_id], map_event_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load events")?;

        Ok(events)
    }
}

fn map_event_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: Some(row.get(0)?),
        calendar_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_time: to_timestamp(row.get::<_, String>(4)?)?,
        end_time: to_timestamp(row.get::<_, String>(5)?)?,
        is_all_day: row.get::<_, i32>(6)? != 0,
        color: row
            .get::<_, Option<String>>(7)?
            .filter(|color| !color.is_empty())
            .unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
        created_by: row.get(8)?,
    })
}

fn to_timestamp(value: String) -> rusqlite::Result<chrono::NaiveDateTime> {
    parse_timestamp(&value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
