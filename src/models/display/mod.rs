//! Display (month-grid) projection of events.
//!
//! A [`DisplayEvent`] is derived from a stored event every time the event
//! list changes and is never persisted. All-day events use a half-open
//! date range: `end` is the day *after* the last included day.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EventTimeError;
use crate::utils::date::{format_date, format_timestamp, parse_date, parse_timestamp};

/// A grid boundary: a bare date for all-day events, a timestamp otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayTime {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl DisplayTime {
    /// Calendar date component.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(timestamp) => timestamp.date(),
        }
    }

    /// Timestamp view; bare dates read as midnight.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Date(date) => crate::utils::date::start_of_day(*date),
            Self::DateTime(timestamp) => *timestamp,
        }
    }

    pub fn is_date_only(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", format_date(*date)),
            Self::DateTime(timestamp) => write!(f, "{}", format_timestamp(*timestamp)),
        }
    }
}

impl FromStr for DisplayTime {
    type Err = EventTimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.contains('T') {
            parse_timestamp(value).map(Self::DateTime)
        } else {
            parse_date(value).map(Self::Date)
        }
    }
}

impl Serialize for DisplayTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DisplayTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Event as handed to the month-grid renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    pub id: String,
    pub title: String,
    pub start: DisplayTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DisplayTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl DisplayEvent {
    pub fn is_all_day(&self) -> bool {
        self.all_day.unwrap_or(false)
    }

    /// Date the event starts on, used for day-detail filtering.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }
}
