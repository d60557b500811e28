// Event module
// Canonical (persisted) calendar event model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::date::{format_timestamp, parse_timestamp};

/// Color applied when no genre is selected or the selected genre is unknown.
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

/// Calendar event as stored.
///
/// `start_time`/`end_time` are local-naive. All-day events run from
/// `D 00:00:00` to the last included day at `23:59:59`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<String>,
    pub calendar_id: String,
    pub title: String,
    #[serde(with = "naive_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "naive_timestamp")]
    pub end_time: NaiveDateTime,
    pub is_all_day: bool,
    pub color: String,
    pub description: Option<String>,
    pub created_by: Option<String>,
}

impl Event {
    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event before it is written to a store.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end_time < self.start_time {
            return Err("Event end time must not be before start time".to_string());
        }

        if !self.color.starts_with('#') || (self.color.len() != 7 && self.color.len() != 4) {
            return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
        }

        Ok(())
    }

    /// Overwrite the fields carried by `patch`.
    pub fn apply_patch(&mut self, patch: &EventPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(is_all_day) = patch.is_all_day {
            self.is_all_day = is_all_day;
        }
        if let Some(ref color) = patch.color {
            self.color = color.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
    }

    /// Get the duration of the event
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}

/// Partial update sent to a store. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub is_all_day: Option<bool>,
    pub color: Option<String>,
    pub description: Option<Option<String>>,
}

impl EventPatch {
    /// Patch touching only the time fields, as produced by a drag.
    pub fn times(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }

    /// Patch replacing every editable field with the values of `event`.
    pub fn full(event: &Event) -> Self {
        Self {
            title: Some(event.title.clone()),
            start_time: Some(event.start_time),
            end_time: Some(event.end_time),
            is_all_day: Some(event.is_all_day),
            color: Some(event.color.clone()),
            description: Some(event.description.clone()),
        }
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<String>,
    calendar_id: Option<String>,
    title: Option<String>,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    is_all_day: bool,
    color: Option<String>,
    description: Option<String>,
    created_by: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            calendar_id: None,
            title: None,
            start_time: None,
            end_time: None,
            is_all_day: false,
            color: None,
            description: None,
            created_by: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start_time(mut self, start_time: NaiveDateTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn end_time(mut self, end_time: NaiveDateTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn all_day(mut self, is_all_day: bool) -> Self {
        self.is_all_day = is_all_day;
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }

    /// Build the event. Missing color falls back to [`DEFAULT_EVENT_COLOR`].
    pub fn build(self) -> Result<Event, String> {
        let calendar_id = self.calendar_id.ok_or("Event calendar is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start_time = self.start_time.ok_or("Event start time is required")?;
        let end_time = self.end_time.ok_or("Event end time is required")?;

        let event = Event {
            id: self.id,
            calendar_id,
            title,
            start_time,
            end_time,
            is_all_day: self.is_all_day,
            color: self.color.unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string()),
            description: self.description,
            created_by: self.created_by,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serde adapter storing timestamps as `YYYY-MM-DDTHH:MM:SS` without offset.
pub(crate) mod naive_timestamp {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
