//! Helpers for the in-memory display list that feeds the month grid.
//!
//! Every helper returns a new list and leaves its input untouched. Unknown
//! ids are not errors: a drag racing a delete simply changes nothing.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::EventTimeError;
use crate::models::display::DisplayEvent;
use crate::services::event::codec::display_bounds;

/// Replace the start/end of the event `id`, keeping its position.
///
/// Uses the same day-boundary convention as
/// [`to_display`](crate::services::event::codec::to_display).
pub fn apply_time_change(
    list: &[DisplayEvent],
    id: &str,
    new_start_time: NaiveDateTime,
    new_end_time: NaiveDateTime,
    is_all_day: bool,
) -> Result<Vec<DisplayEvent>, EventTimeError> {
    if !list.iter().any(|event| event.id == id) {
        return Ok(list.to_vec());
    }

    let (start, end) = display_bounds(new_start_time, new_end_time, is_all_day)?;
    Ok(list
        .iter()
        .map(|event| {
            if event.id == id {
                DisplayEvent {
                    start,
                    end: Some(end),
                    ..event.clone()
                }
            } else {
                event.clone()
            }
        })
        .collect())
}

/// Events whose display start falls on `date`.
pub fn filter_by_date(list: &[DisplayEvent], date: NaiveDate) -> Vec<DisplayEvent> {
    list.iter()
        .filter(|event| event.start_date() == date)
        .cloned()
        .collect()
}

/// Drop the event `id` from the list.
pub fn remove_event(list: &[DisplayEvent], id: &str) -> Vec<DisplayEvent> {
    list.iter().filter(|event| event.id != id).cloned().collect()
}

/// Replace the entry with the same id in place, or append it.
pub fn upsert_event(list: &[DisplayEvent], updated: DisplayEvent) -> Vec<DisplayEvent> {
    let mut next = list.to_vec();
    match next.iter_mut().find(|event| event.id == updated.id) {
        Some(slot) => *slot = updated,
        None => next.push(updated),
    }
    next
}
