use crate::models::settings::CalendarSettings;
use crate::services::database::Database;
use anyhow::{anyhow, Context, Result};

use super::mapper::row_to_settings;

pub struct SettingsService<'a> {
    db: &'a Database,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get the current calendar settings
    pub fn get(&self) -> Result<CalendarSettings> {
        let conn = self.db.connection();

        let settings = conn
            .query_row(
                "SELECT id, default_start_time, default_end_time, first_day_of_week, theme_color
             FROM settings WHERE id = 1",
                [],
                row_to_settings,
            )
            .context("Failed to load settings")?;

        Ok(settings)
    }

    /// Update settings
    pub fn update(&self, settings: &CalendarSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        let conn = self.db.connection();

        conn.execute(
            "UPDATE settings \
             SET default_start_time = ?1, \
                 default_end_time = ?2, \
                 first_day_of_week = ?3, \
                 theme_color = ?4, \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = 1",
            (
                &settings.default_start_time,
                &settings.default_end_time,
                settings.first_day_of_week,
                &settings.theme_color,
            ),
        )
        .context("Failed to update settings")?;

        log::info!("Calendar settings updated");
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.update(&CalendarSettings::default())
    }
}
