// Shared Calendar
// Lists the events of one day from the configured store

use anyhow::{Context, Result};

use shared_calendar::config::AppConfig;
use shared_calendar::models::display::DisplayEvent;
use shared_calendar::models::genre::GenreRegistry;
use shared_calendar::models::settings::CalendarSettings;
use shared_calendar::services::genre::GenreService;
use shared_calendar::services::session::CalendarSession;
use shared_calendar::services::settings::SettingsService;
use shared_calendar::services::store::SessionStore;
use shared_calendar::utils::date::{format_date_for_display, format_time, parse_date, today};

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    log::info!("Starting Shared Calendar");

    let date = match std::env::args().nth(1) {
        Some(raw) => parse_date(&raw).context("Usage: shared-calendar [YYYY-MM-DD]")?,
        None => today(),
    };

    let store = SessionStore::open(&config)?;
    let (settings, genres) = match &store {
        SessionStore::Remote(remote) => {
            let db = remote.database();
            (
                SettingsService::new(db).get()?,
                GenreService::new(db.connection()).registry(&config.calendar_id)?,
            )
        }
        SessionStore::Local(_) => (CalendarSettings::default(), GenreRegistry::new()),
    };

    let mut session = CalendarSession::new(store, config.calendar_id.clone())
        .with_settings(settings)
        .with_genres(genres);
    session.load()?;

    println!("{}", format_date_for_display(date));
    let events = session.events_on(date);
    if events.is_empty() {
        println!("  (no events)");
    }
    for event in &events {
        println!("  {}", describe(event));
    }

    Ok(())
}

fn describe(event: &DisplayEvent) -> String {
    if event.is_all_day() {
        return format!("終日        {}", event.title);
    }

    let start = format_time(event.start.timestamp());
    let end = event
        .end
        .map(|end| format_time(end.timestamp()))
        .unwrap_or_else(|| start.clone());
    format!("{} - {}  {}", start, end, event.title)
}
