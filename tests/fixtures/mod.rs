// Test fixtures - reusable test data
// Provides consistent dates, events and forms across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};

use shared_calendar::models::event::Event;
use shared_calendar::models::form::EventFormData;

pub const CALENDAR_ID: &str = "family";

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Wednesday, Oct 8 2025
    pub fn oct_8_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 8).unwrap()
    }

    /// Last day of the month, for ranges that roll over
    pub fn oct_31_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 31).unwrap()
    }

    /// Feb 28, 2024 (the day before a leap day)
    pub fn feb_28_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 28).unwrap()
    }

    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }
}

/// Sample stored events
pub mod events {
    use super::*;

    pub fn dentist() -> Event {
        let day = dates::oct_8_2025();
        Event::builder()
            .calendar_id(CALENDAR_ID)
            .title("Dentist")
            .start_time(dates::at(day, 15, 0))
            .end_time(dates::at(day, 16, 0))
            .description("bring insurance card")
            .build()
            .unwrap()
    }

    /// Oct 8-10 inclusive
    pub fn school_trip() -> Event {
        let day = dates::oct_8_2025();
        Event::builder()
            .calendar_id(CALENDAR_ID)
            .title("School trip")
            .start_time(day.and_hms_opt(0, 0, 0).unwrap())
            .end_time(NaiveDate::from_ymd_opt(2025, 10, 10).unwrap().and_hms_opt(23, 59, 59).unwrap())
            .all_day(true)
            .color("#F59E0B")
            .build()
            .unwrap()
    }
}

/// Sample submitted forms
pub mod forms {
    use super::*;

    pub fn timed(title: &str, start_date: &str, end_date: &str) -> EventFormData {
        EventFormData {
            title: title.to_string(),
            start_date: start_date.to_string(),
            start_time: "09:00".to_string(),
            end_date: end_date.to_string(),
            end_time: "10:00".to_string(),
            ..EventFormData::default()
        }
    }

    pub fn all_day(title: &str, start_date: &str, end_date: &str) -> EventFormData {
        EventFormData {
            title: title.to_string(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            all_day: true,
            ..EventFormData::default()
        }
    }
}
