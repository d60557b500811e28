use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_settings_table(conn)?;
    insert_default_settings(conn)?;
    create_genres_table(conn)?;
    create_events_table(conn)?;
    run_event_migrations(conn)?;
    create_event_indexes(conn)?;
    log::debug!("Database schema initialized");
    Ok(())
}

fn create_settings_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            default_start_time TEXT NOT NULL DEFAULT '09:00',
            default_end_time TEXT NOT NULL DEFAULT '10:00',
            first_day_of_week INTEGER NOT NULL DEFAULT 0,
            theme_color TEXT NOT NULL DEFAULT '#1e293b',
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create settings table")?;

    Ok(())
}

fn insert_default_settings(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO settings (
            id, default_start_time, default_end_time, first_day_of_week, theme_color
        )
        VALUES (1, '09:00', '10:00', 0, '#1e293b')",
        [],
    )
    .context("Failed to insert default settings")?;

    Ok(())
}

fn create_genres_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS genres (
            id TEXT PRIMARY KEY,
            calendar_id TEXT NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (calendar_id, color)
        )",
        [],
    )
    .context("Failed to create genres table")?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            calendar_id TEXT NOT NULL,
            title TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            color TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

/// Columns added after the first release of the events table.
fn run_event_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "description",
        "ALTER TABLE events ADD COLUMN description TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "created_by",
        "ALTER TABLE events ADD COLUMN created_by TEXT",
    )?;

    Ok(())
}

fn create_event_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_calendar_start
         ON events (calendar_id, start_time)",
        [],
    )
    .context("Failed to create events index")?;

    Ok(())
}
