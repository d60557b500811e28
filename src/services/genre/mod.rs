//! Genre service for the per-calendar color tags.
//!
//! The registry rules (palette, name length, unique color, cap of
//! [`MAX_GENRES_PER_CALENDAR`]) are checked against the stored genres
//! before every write. The table's `UNIQUE(calendar_id, color)` constraint
//! backs up the color rule.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

use crate::models::genre::{Genre, GenreRegistry, GenreValidationError, MAX_GENRES_PER_CALENDAR};

/// Service for managing the genres of calendars.
pub struct GenreService<'a> {
    conn: &'a Connection,
}

impl<'a> GenreService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All genres of a calendar, in creation order.
    pub fn list(&self, calendar_id: &str) -> Result<Vec<Genre>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, color FROM genres
                 WHERE calendar_id = ?1
                 ORDER BY created_at, rowid",
            )
            .context("Failed to prepare genre query")?;

        let genres = stmt
            .query_map(params![calendar_id], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load genres")?;

        Ok(genres)
    }

    /// Registry view of a calendar's genres, used for color lookups.
    pub fn registry(&self, calendar_id: &str) -> Result<GenreRegistry> {
        Ok(GenreRegistry::from_genres(self.list(calendar_id)?))
    }

    /// Create a genre after checking it against the calendar's registry.
    pub fn create(&self, calendar_id: &str, genre: Genre) -> Result<Genre> {
        let registry = self.registry(calendar_id)?;
        registry
            .check_add(&genre)
            .map_err(|e| anyhow!("Cannot add genre '{}': {}", genre.name, e))?;

        let genre = Genre {
            name: genre.name.trim().to_string(),
            ..genre
        };

        self.conn
            .execute(
                "INSERT INTO genres (id, calendar_id, name, color) VALUES (?1, ?2, ?3, ?4)",
                params![genre.id, calendar_id, genre.name, genre.color],
            )
            .context("Failed to insert genre")?;

        log::info!(
            "Created genre '{}' ({}) in calendar {} ({}/{})",
            genre.name,
            genre.color,
            calendar_id,
            registry.len() + 1,
            MAX_GENRES_PER_CALENDAR
        );
        Ok(genre)
    }

    /// Rename or recolor a genre. Events keep the color they were saved with.
    pub fn update(&self, calendar_id: &str, genre: &Genre) -> Result<()> {
        genre.validate().map_err(|e| anyhow!("{}", e))?;

        let registry = self.registry(calendar_id)?;
        if registry
            .genres()
            .iter()
            .any(|other| other.id != genre.id && other.color == genre.color)
        {
            return Err(anyhow!("{}", GenreValidationError::ColorInUse));
        }

        let rows_affected = self
            .conn
            .execute(
                "UPDATE genres SET name = ?1, color = ?2 WHERE id = ?3 AND calendar_id = ?4",
                params![genre.name.trim(), genre.color, genre.id, calendar_id],
            )
            .context("Failed to update genre")?;

        if rows_affected == 0 {
            return Err(anyhow!("Genre with id {} not found", genre.id));
        }

        Ok(())
    }

    /// Delete a genre. Events tagged with it keep their color.
    pub fn delete(&self, calendar_id: &str, id: &str) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM genres WHERE id = ?1 AND calendar_id = ?2",
                params![id, calendar_id],
            )
            .context("Failed to delete genre")?;

        if rows_affected == 0 {
            return Err(anyhow!("Genre with id {} not found", id));
        }

        log::info!("Deleted genre {} from calendar {}", id, calendar_id);
        Ok(())
    }
}
