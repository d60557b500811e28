//! Turning a saved form into the rows to store.
//!
//! A timed form whose end date is later than its start date is read as
//! "repeat this time block on every day of the range" and produces one
//! independent row per day. An all-day form always produces a single row
//! spanning the whole range.

use crate::error::EventTimeError;
use crate::models::event::Event;
use crate::models::form::EventFormData;
use crate::models::genre::GenreRegistry;
use crate::models::settings::CalendarSettings;
use crate::services::event::codec::{form_times, to_canonical_with, CanonicalInterval};
use crate::utils::date::{add_days, days_between, parse_date};

/// Everything a save needs besides the form itself.
#[derive(Debug, Clone, Copy)]
pub struct SaveContext<'a> {
    pub calendar_id: &'a str,
    pub created_by: Option<&'a str>,
    pub genres: &'a GenreRegistry,
    pub settings: &'a CalendarSettings,
}

/// One interval per covered day for a timed multi-day form.
///
/// Returns a single interval when the form covers one day (or its end
/// date precedes its start date).
pub fn expand_daily(
    form: &EventFormData,
    settings: &CalendarSettings,
) -> Result<Vec<CanonicalInterval>, EventTimeError> {
    let start_date = parse_date(&form.start_date)?;
    let end_date = parse_date(form.effective_end_date())?;
    let days_diff = days_between(start_date, end_date);

    if form.all_day || days_diff <= 0 {
        return Ok(vec![to_canonical_with(form, settings)?]);
    }

    let (start, end) = form_times(form, settings)?;
    (0..=days_diff)
        .map(|offset| -> Result<CanonicalInterval, EventTimeError> {
            let day = add_days(start_date, offset)?;
            Ok(CanonicalInterval::new(day.and_time(start), day.and_time(end)))
        })
        .collect()
}

/// Rows to write for a saved form.
///
/// When the form edits an existing event the first row carries its id and
/// replaces it; every other row is new. The color is copied from the
/// selected genre.
pub fn plan_save(form: &EventFormData, ctx: &SaveContext<'_>) -> Result<Vec<Event>, EventTimeError> {
    let color = ctx.genres.color_for(&form.genre).to_string();
    let intervals = expand_daily(form, ctx.settings)?;

    let events = intervals
        .into_iter()
        .enumerate()
        .map(|(index, interval)| Event {
            id: if index == 0 { form.id.clone() } else { None },
            calendar_id: ctx.calendar_id.to_string(),
            title: form.title.clone(),
            start_time: interval.start_time,
            end_time: interval.end_time,
            is_all_day: form.all_day,
            color: color.clone(),
            description: form.description(),
            created_by: ctx.created_by.map(str::to_string),
        })
        .collect();

    Ok(events)
}
