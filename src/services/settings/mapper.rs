use crate::models::settings::CalendarSettings;
use rusqlite::Row;

pub fn row_to_settings(row: &Row) -> Result<CalendarSettings, rusqlite::Error> {
    Ok(CalendarSettings {
        id: Some(row.get(0)?),
        default_start_time: row.get(1)?,
        default_end_time: row.get(2)?,
        first_day_of_week: row.get(3)?,
        theme_color: row.get(4)?,
    })
}
