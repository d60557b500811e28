//! Conversion between stored events, the display projection and form input.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::EventTimeError;
use crate::models::display::{DisplayEvent, DisplayTime};
use crate::models::event::{Event, DEFAULT_EVENT_COLOR};
use crate::models::form::EventFormData;
use crate::models::settings::CalendarSettings;
use crate::utils::date::{end_of_day, next_day, parse_date, parse_time, start_of_day};

/// Start/end pair in stored form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalInterval {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl CanonicalInterval {
    pub fn new(start_time: NaiveDateTime, end_time: NaiveDateTime) -> Self {
        Self { start_time, end_time }
    }

    /// Interval covering whole days `first..=last`.
    pub fn all_day(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }
}

/// Grid boundaries for a stored interval.
///
/// All-day intervals become `[first day, last day + 1)`; timed intervals
/// pass through unchanged.
pub fn display_bounds(
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    is_all_day: bool,
) -> Result<(DisplayTime, DisplayTime), EventTimeError> {
    if is_all_day {
        let exclusive_end = next_day(end_time.date())?;
        Ok((
            DisplayTime::Date(start_time.date()),
            DisplayTime::Date(exclusive_end),
        ))
    } else {
        Ok((DisplayTime::DateTime(start_time), DisplayTime::DateTime(end_time)))
    }
}

/// Project a stored event for the month grid.
pub fn to_display(event: &Event) -> Result<DisplayEvent, EventTimeError> {
    let (start, end) = display_bounds(event.start_time, event.end_time, event.is_all_day)?;
    let color = if event.color.is_empty() {
        DEFAULT_EVENT_COLOR.to_string()
    } else {
        event.color.clone()
    };

    Ok(DisplayEvent {
        id: event.id.clone().unwrap_or_default(),
        title: event.title.clone(),
        start,
        end: Some(end),
        all_day: Some(event.is_all_day),
        color: Some(color),
    })
}

/// Project a whole list, stopping at the first event that cannot be shown.
pub fn to_display_list(events: &[Event]) -> Result<Vec<DisplayEvent>, EventTimeError> {
    events.iter().map(to_display).collect()
}

/// Stored interval for a form, using the standard 09:00/10:00 defaults
/// for blank times.
pub fn to_canonical(form: &EventFormData) -> Result<CanonicalInterval, EventTimeError> {
    to_canonical_with(form, &CalendarSettings::default())
}

/// Stored interval for a form.
///
/// A blank end date means a single-day event. Blank times fall back to the
/// settings' defaults. `end_time < start_time` is not rejected here.
pub fn to_canonical_with(
    form: &EventFormData,
    settings: &CalendarSettings,
) -> Result<CanonicalInterval, EventTimeError> {
    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_date(form.effective_end_date())?;

    if form.all_day {
        return Ok(CanonicalInterval::all_day(start_date, end_date));
    }

    let (start, end) = form_times(form, settings)?;
    Ok(CanonicalInterval::new(
        start_date.and_time(start),
        end_date.and_time(end),
    ))
}

/// Parsed start/end times of a timed form, with defaults applied.
pub(crate) fn form_times(
    form: &EventFormData,
    settings: &CalendarSettings,
) -> Result<(chrono::NaiveTime, chrono::NaiveTime), EventTimeError> {
    let start = if form.start_time.trim().is_empty() {
        settings.default_start()
    } else {
        parse_time(&form.start_time)?
    };
    let end = if form.end_time.trim().is_empty() {
        settings.default_end()
    } else {
        parse_time(&form.end_time)?
    };
    Ok((start, end))
}
