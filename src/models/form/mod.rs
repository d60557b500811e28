//! Create/edit form model.
//!
//! Dates and times are kept as the strings the form widgets produce
//! (`YYYY-MM-DD`, `HH:MM`) and are only parsed when the form is saved.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EventTimeError;
use crate::models::display::DisplayEvent;
use crate::models::event::Event;
use crate::models::genre::GenreRegistry;
use crate::models::settings::CalendarSettings;
use crate::utils::date::{format_date, previous_day, TIME_FORMAT};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventFormData {
    /// Present when editing an existing event, absent when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub all_day: bool,
    /// Genre id, empty when no genre is selected.
    pub genre: String,
    pub memo: String,
}

impl EventFormData {
    /// Blank form for a new event on `date`, pre-filled with the default times.
    pub fn for_new_on(date: NaiveDate, settings: &CalendarSettings) -> Self {
        let day = format_date(date);
        Self {
            id: None,
            title: String::new(),
            start_date: day.clone(),
            start_time: settings.default_start().format(TIME_FORMAT).to_string(),
            end_date: day,
            end_time: settings.default_end().format(TIME_FORMAT).to_string(),
            all_day: false,
            genre: String::new(),
            memo: String::new(),
        }
    }

    /// Edit form for a stored event.
    ///
    /// The genre is recovered by matching the event color against the
    /// registry, so saving the form unchanged keeps the color.
    pub fn from_event(event: &Event, genres: &GenreRegistry) -> Self {
        let genre = genres
            .genres()
            .iter()
            .find(|g| g.color == event.color)
            .map(|g| g.id.clone())
            .unwrap_or_default();

        let (start_time, end_time) = if event.is_all_day {
            (String::new(), String::new())
        } else {
            (form_time(event.start_time), form_time(event.end_time))
        };

        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            start_date: format_date(event.start_time.date()),
            start_time,
            end_date: format_date(event.end_time.date()),
            end_time,
            all_day: event.is_all_day,
            genre,
            memo: event.description.clone().unwrap_or_default(),
        }
    }

    /// Edit form rebuilt from a display projection.
    ///
    /// For all-day events the exclusive grid end is turned back into the
    /// last included day.
    pub fn from_display(event: &DisplayEvent) -> Result<Self, EventTimeError> {
        let all_day = event.is_all_day();
        let start = event.start.timestamp();

        let (end_date, start_time, end_time) = if all_day {
            let last_day = match event.end {
                Some(end) => previous_day(end.date())?,
                None => start.date(),
            };
            (last_day, String::new(), String::new())
        } else {
            let end = event.end.map(|e| e.timestamp()).unwrap_or(start);
            (end.date(), form_time(start), form_time(end))
        };

        Ok(Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            start_date: format_date(start.date()),
            start_time,
            end_date: format_date(end_date),
            end_time,
            all_day,
            genre: String::new(),
            memo: String::new(),
        })
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// End date to use, falling back to the start date when blank.
    pub fn effective_end_date(&self) -> &str {
        if self.end_date.trim().is_empty() {
            &self.start_date
        } else {
            &self.end_date
        }
    }

    /// Memo as an optional description; blank memos are dropped.
    pub fn description(&self) -> Option<String> {
        let memo = self.memo.trim();
        (!memo.is_empty()).then(|| self.memo.clone())
    }
}

/// `HH:MM`, or `HH:MM:SS` when the seconds are not zero.
fn form_time(timestamp: NaiveDateTime) -> String {
    if timestamp.second() == 0 {
        timestamp.format(TIME_FORMAT).to_string()
    } else {
        timestamp.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::genre::Genre;
    use pretty_assertions::assert_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn test_for_new_on_uses_settings() {
        let settings = CalendarSettings {
            default_start_time: "08:30".to_string(),
            default_end_time: "09:15".to_string(),
            ..CalendarSettings::default()
        };
        let form = EventFormData::for_new_on(date(8), &settings);

        assert_eq!(form.start_date, "2025-10-08");
        assert_eq!(form.end_date, "2025-10-08");
        assert_eq!(form.start_time, "08:30");
        assert_eq!(form.end_time, "09:15");
        assert!(!form.is_editing());
    }

    #[test]
    fn test_from_event_recovers_genre_by_color() {
        let mut genres = GenreRegistry::new();
        let travel = Genre::new("Travel", "#14B8A6");
        let travel_id = travel.id.clone();
        genres.add(travel).unwrap();

        let event = Event::builder()
            .id("ev-1")
            .calendar_id("cal-1")
            .title("Trip")
            .start_time(date(8).and_hms_opt(0, 0, 0).unwrap())
            .end_time(date(10).and_hms_opt(23, 59, 59).unwrap())
            .all_day(true)
            .color("#14B8A6")
            .description("pack early")
            .build()
            .unwrap();

        let form = EventFormData::from_event(&event, &genres);
        assert_eq!(
            form,
            EventFormData {
                id: Some("ev-1".to_string()),
                title: "Trip".to_string(),
                start_date: "2025-10-08".to_string(),
                start_time: String::new(),
                end_date: "2025-10-10".to_string(),
                end_time: String::new(),
                all_day: true,
                genre: travel_id,
                memo: "pack early".to_string(),
            }
        );
    }

    #[test]
    fn test_from_display_all_day_drops_exclusive_end() {
        let display = DisplayEvent {
            id: "1".to_string(),
            title: "Holiday".to_string(),
            start: "2025-10-31".parse().unwrap(),
            end: Some("2025-11-01".parse().unwrap()),
            all_day: Some(true),
            color: None,
        };

        let form = EventFormData::from_display(&display).unwrap();
        assert_eq!(form.start_date, "2025-10-31");
        assert_eq!(form.end_date, "2025-10-31");
        assert!(form.all_day);
    }

    #[test]
    fn test_from_display_timed_keeps_seconds() {
        let display = DisplayEvent {
            id: "1".to_string(),
            title: "Call".to_string(),
            start: "2025-10-08T09:00:00".parse().unwrap(),
            end: Some("2025-10-08T09:45:30".parse().unwrap()),
            all_day: Some(false),
            color: None,
        };

        let form = EventFormData::from_display(&display).unwrap();
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.end_time, "09:45:30");
    }

    #[test]
    fn test_effective_end_date_and_description() {
        let form = EventFormData {
            start_date: "2025-10-08".to_string(),
            memo: "   ".to_string(),
            ..EventFormData::default()
        };
        assert_eq!(form.effective_end_date(), "2025-10-08");
        assert!(form.description().is_none());
    }
}
