//! Drag-and-drop rescheduling.
//!
//! The grid reports where a dragged event landed; this module re-expresses
//! that position as a stored interval. Duration preservation is the grid's
//! job: the reported end already reflects it.

use chrono::SubsecRound;

use crate::error::EventTimeError;
use crate::models::display::DisplayTime;
use crate::services::event::codec::CanonicalInterval;
use crate::utils::date::previous_day;

/// Position reported by the grid after a drop.
///
/// For all-day events `end` is exclusive, one day past the last day shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropGeometry {
    pub start: Option<DisplayTime>,
    pub end: Option<DisplayTime>,
}

impl DropGeometry {
    pub fn new(start: DisplayTime, end: Option<DisplayTime>) -> Self {
        Self {
            start: Some(start),
            end,
        }
    }

    /// Build from the raw strings a renderer hands over.
    ///
    /// A blank end counts as absent. An unparsable start or end is an error,
    /// so a garbled end never turns into a zero-length event.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, EventTimeError> {
        let start = start
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| EventTimeError::InvalidDropGeometry("missing start".to_string()))?
            .parse::<DisplayTime>()
            .map_err(|e| EventTimeError::InvalidDropGeometry(e.to_string()))?;
        let end = end
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.parse::<DisplayTime>()
                    .map_err(|e| EventTimeError::InvalidDropGeometry(format!("bad end: {}", e)))
            })
            .transpose()?;

        Ok(Self::new(start, end))
    }
}

/// Compute the stored interval for an event dropped at `drop`.
///
/// `is_all_day` is the flag the event had before the drag; a drag never
/// changes it.
pub fn recompute_after_drop(
    drop: &DropGeometry,
    is_all_day: bool,
) -> Result<CanonicalInterval, EventTimeError> {
    let start = drop
        .start
        .ok_or_else(|| EventTimeError::InvalidDropGeometry("missing start".to_string()))?;

    let interval = if is_all_day {
        // An all-day span can only be re-expressed from both ends.
        let end = drop.end.ok_or_else(|| {
            EventTimeError::InvalidDropGeometry("all-day drop without an end".to_string())
        })?;

        let first_day = start.date();
        let last_day = previous_day(end.date())?;
        if last_day < first_day {
            return Err(EventTimeError::InvalidDropGeometry(format!(
                "end {} is not after start {}",
                end, start
            )));
        }
        CanonicalInterval::all_day(first_day, last_day)
    } else {
        let new_start = start.timestamp().trunc_subsecs(0);
        // Zero-duration fallback when the grid reports no end.
        let new_end = drop
            .end
            .map(|end| end.timestamp().trunc_subsecs(0))
            .unwrap_or(new_start);
        CanonicalInterval::new(new_start, new_end)
    };

    log::debug!(
        "Drop recomputed (all_day={}): {} -> {}",
        is_all_day,
        interval.start_time,
        interval.end_time
    );

    Ok(interval)
}
