//! Calendar session: the state behind one open calendar view.
//!
//! A session owns the display list the month grid renders, the store chosen
//! at start-up, the calendar's genres and its settings. Mutations go to the
//! store first, except drags, which update the list optimistically and roll
//! back if the store refuses the change.

use chrono::NaiveDate;

use crate::error::{SessionError, SessionResult};
use crate::models::display::DisplayEvent;
use crate::models::event::{Event, EventPatch};
use crate::models::form::EventFormData;
use crate::models::genre::GenreRegistry;
use crate::models::settings::CalendarSettings;
use crate::services::event::list::{remove_event, upsert_event};
use crate::services::event::{
    apply_time_change, filter_by_date, plan_save, recompute_after_drop, to_display, to_display_list,
    DropGeometry, SaveContext,
};
use crate::services::store::EventStore;

pub struct CalendarSession<S: EventStore> {
    store: S,
    calendar_id: String,
    user_id: Option<String>,
    settings: CalendarSettings,
    genres: GenreRegistry,
    events: Vec<DisplayEvent>,
}

impl<S: EventStore> CalendarSession<S> {
    pub fn new(store: S, calendar_id: impl Into<String>) -> Self {
        Self {
            store,
            calendar_id: calendar_id.into(),
            user_id: None,
            settings: CalendarSettings::default(),
            genres: GenreRegistry::new(),
            events: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: CalendarSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_genres(mut self, genres: GenreRegistry) -> Self {
        self.genres = genres;
        self
    }

    /// Signed-in user recorded as the creator of new rows.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn genres(&self) -> &GenreRegistry {
        &self.genres
    }

    pub fn set_genres(&mut self, genres: GenreRegistry) {
        self.genres = genres;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The current display list.
    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// Replace the display list with every stored event of the calendar.
    pub fn load(&mut self) -> SessionResult<&[DisplayEvent]> {
        let stored = self
            .store
            .select(&self.calendar_id)
            .map_err(SessionError::persistence)?;
        self.events = to_display_list(&stored)?;

        log::info!(
            "Loaded {} events for calendar {}",
            self.events.len(),
            self.calendar_id
        );
        Ok(&self.events)
    }

    /// Create or edit from a submitted form and return the saved rows.
    ///
    /// Every row is validated before anything is written. If the store then
    /// fails part-way through a multi-day form, the rows this save already
    /// inserted are deleted again, an edited row gets its old values back,
    /// the display list is left as it was and `PersistenceFailure` is
    /// returned. Undo failures are only logged.
    pub fn save_form(&mut self, form: &EventFormData) -> SessionResult<Vec<DisplayEvent>> {
        if form.title.trim().is_empty() {
            return Err(SessionError::InvalidEvent("title is required".to_string()));
        }
        if form.start_date.trim().is_empty() {
            return Err(SessionError::InvalidEvent("start date is required".to_string()));
        }

        let ctx = SaveContext {
            calendar_id: &self.calendar_id,
            created_by: self.user_id.as_deref(),
            genres: &self.genres,
            settings: &self.settings,
        };
        let rows = plan_save(form, &ctx)?;
        for row in &rows {
            row.validate().map_err(SessionError::InvalidEvent)?;
            to_display(row)?;
        }

        // Only a multi-row edit can leave an updated row behind on failure.
        let previous = match rows.first().and_then(|row| row.id.as_deref()) {
            Some(id) if rows.len() > 1 => self.stored_event(id)?,
            _ => None,
        };

        let mut inserted: Vec<String> = Vec::new();
        let mut updated = false;
        let mut stored_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let is_update = row.id.is_some();
            let result = match row.id.clone() {
                Some(id) => self.store.update(&id, &EventPatch::full(&row)),
                None => self.store.insert(row),
            };

            match result {
                Ok(stored) => {
                    if is_update {
                        updated = true;
                    } else if let Some(id) = stored.id.clone() {
                        inserted.push(id);
                    }
                    stored_rows.push(stored);
                }
                Err(err) => {
                    log::error!(
                        "Failed to save '{}' after {} of its rows: {:#}",
                        form.title,
                        stored_rows.len(),
                        err
                    );
                    self.undo_partial_save(&inserted, previous.as_ref().filter(|_| updated));
                    return Err(SessionError::persistence(err));
                }
            }
        }

        let saved = to_display_list(&stored_rows)?;
        for display in &saved {
            self.events = upsert_event(&self.events, display.clone());
        }

        log::info!(
            "Saved '{}' as {} row(s) in calendar {}",
            form.title,
            saved.len(),
            self.calendar_id
        );
        Ok(saved)
    }

    fn undo_partial_save(&mut self, inserted: &[String], previous: Option<&Event>) {
        for id in inserted.iter().rev() {
            if let Err(err) = self.store.delete(id) {
                log::warn!("Failed to remove partially saved event {}: {:#}", id, err);
            }
        }

        if let Some(event) = previous {
            if let Some(id) = event.id.as_deref() {
                if let Err(err) = self.store.update(id, &EventPatch::full(event)) {
                    log::warn!("Failed to restore event {}: {:#}", id, err);
                }
            }
        }
    }

    fn stored_event(&self, id: &str) -> SessionResult<Option<Event>> {
        let stored = self
            .store
            .select(&self.calendar_id)
            .map_err(SessionError::persistence)?;

        Ok(stored
            .into_iter()
            .find(|event| event.id.as_deref() == Some(id)))
    }

    /// Move an event to where the grid dropped it.
    ///
    /// The list is updated before the store is asked. When the store fails
    /// the event is put back where it was and `PersistenceFailure` is
    /// returned. An unusable drop, or an `is_all_day` that disagrees with the
    /// event being moved, leaves both the list and the store alone.
    pub fn reschedule(
        &mut self,
        id: &str,
        drop: &DropGeometry,
        is_all_day: bool,
    ) -> SessionResult<DisplayEvent> {
        let previous = self
            .events
            .iter()
            .find(|event| event.id == id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        // A drag never turns a timed event into an all-day one or back.
        if previous.is_all_day() != is_all_day {
            return Err(SessionError::InvalidEvent(format!(
                "event {} is {}, but was dropped as {}",
                id,
                day_kind(previous.is_all_day()),
                day_kind(is_all_day)
            )));
        }

        let interval = recompute_after_drop(drop, is_all_day)?;
        self.events = apply_time_change(
            &self.events,
            id,
            interval.start_time,
            interval.end_time,
            is_all_day,
        )?;

        let patch = EventPatch::times(interval.start_time, interval.end_time);
        match self.store.update(id, &patch) {
            Ok(stored) => {
                let display = to_display(&stored)?;
                self.events = upsert_event(&self.events, display.clone());
                log::debug!("Rescheduled event {} to {}", id, display.start);
                Ok(display)
            }
            Err(err) => {
                log::error!("Failed to reschedule event {}, rolling back: {:#}", id, err);
                self.events = upsert_event(&self.events, previous);
                Err(SessionError::persistence(err))
            }
        }
    }

    pub fn delete(&mut self, id: &str) -> SessionResult<()> {
        self.store.delete(id).map_err(SessionError::persistence)?;
        self.events = remove_event(&self.events, id);
        log::info!("Deleted event {} from calendar {}", id, self.calendar_id);
        Ok(())
    }

    /// Events starting on `date`, for the day-detail view.
    pub fn events_on(&self, date: NaiveDate) -> Vec<DisplayEvent> {
        filter_by_date(&self.events, date)
    }

    pub fn form_for_new(&self, date: NaiveDate) -> EventFormData {
        EventFormData::for_new_on(date, &self.settings)
    }

    /// Edit form for a stored event, with its genre and memo restored.
    pub fn form_for_edit(&self, id: &str) -> SessionResult<EventFormData> {
        self.stored_event(id)?
            .map(|event| EventFormData::from_event(&event, &self.genres))
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }
}

fn day_kind(is_all_day: bool) -> &'static str {
    if is_all_day {
        "all-day"
    } else {
        "timed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventTimeError;
    use crate::models::display::DisplayTime;
    use crate::models::genre::Genre;
    use crate::services::store::{LocalStore, MockEventStore};
    use crate::utils::date::parse_timestamp;
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    fn stored(id: &str, start: &str, end: &str, all_day: bool) -> Event {
        Event {
            id: Some(id.to_string()),
            calendar_id: "cal-1".to_string(),
            title: format!("Event {}", id),
            start_time: parse_timestamp(start).unwrap(),
            end_time: parse_timestamp(end).unwrap(),
            is_all_day: all_day,
            color: "#3B82F6".to_string(),
            description: None,
            created_by: None,
        }
    }

    fn seeded_mock() -> MockEventStore {
        let mut store = MockEventStore::new();
        store.expect_select().with(eq("cal-1")).returning(|_| {
            Ok(vec![
                stored("a", "2025-10-08T09:00:00", "2025-10-08T10:00:00", false),
                stored("b", "2025-10-08T00:00:00", "2025-10-10T23:59:59", true),
            ])
        });
        store
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_load_projects_all_day_end() {
        let mut session = CalendarSession::new(seeded_mock(), "cal-1");
        let events = session.load().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].start.to_string(), "2025-10-08");
        assert_eq!(events[1].end.unwrap().to_string(), "2025-10-11");
    }

    #[test]
    fn test_load_failure_is_persistence_error() {
        let mut store = MockEventStore::new();
        store
            .expect_select()
            .returning(|_| Err(anyhow!("connection refused")));

        let mut session = CalendarSession::new(store, "cal-1");
        let err = session.load().unwrap_err();
        assert!(matches!(err, SessionError::PersistenceFailure(_)));
    }

    #[test]
    fn test_reschedule_rolls_back_when_store_fails() {
        let mut store = seeded_mock();
        store
            .expect_update()
            .times(1)
            .returning(|_, _| Err(anyhow!("permission denied")));

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();
        let before = session.events().to_vec();

        let drop = DropGeometry::parse(Some("2025-10-15T13:00:00"), Some("2025-10-15T14:00:00")).unwrap();
        let err = session.reschedule("a", &drop, false).unwrap_err();

        assert!(matches!(err, SessionError::PersistenceFailure(ref msg) if msg.contains("permission denied")));
        assert_eq!(session.events(), before.as_slice());
    }

    #[test]
    fn test_reschedule_all_day_persists_canonical_interval() {
        let mut store = seeded_mock();
        store
            .expect_update()
            .withf(|id, patch| {
                id == "b"
                    && patch.start_time == Some(parse_timestamp("2025-10-20T00:00:00").unwrap())
                    && patch.end_time == Some(parse_timestamp("2025-10-22T23:59:59").unwrap())
                    && patch.title.is_none()
            })
            .times(1)
            .returning(|_, patch| {
                let mut event = stored("b", "2025-10-08T00:00:00", "2025-10-10T23:59:59", true);
                event.apply_patch(patch);
                Ok(event)
            });

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();

        let drop = DropGeometry::new(
            DisplayTime::Date(date("2025-10-20")),
            Some(DisplayTime::Date(date("2025-10-23"))),
        );
        let moved = session.reschedule("b", &drop, true).unwrap();

        assert_eq!(moved.start.to_string(), "2025-10-20");
        assert_eq!(moved.end.unwrap().to_string(), "2025-10-23");
        assert_eq!(session.events()[1], moved);
    }

    #[test]
    fn test_reschedule_invalid_drop_never_reaches_store() {
        let mut store = seeded_mock();
        store.expect_update().never();

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();
        let before = session.events().to_vec();

        let err = session
            .reschedule("a", &DropGeometry::default(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Time(EventTimeError::InvalidDropGeometry(_))
        ));
        assert_eq!(session.events(), before.as_slice());
    }

    #[test]
    fn test_reschedule_unknown_event() {
        let mut store = seeded_mock();
        store.expect_update().never();

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();

        let drop = DropGeometry::parse(Some("2025-10-15T13:00:00"), None).unwrap();
        assert_eq!(
            session.reschedule("zzz", &drop, false).unwrap_err(),
            SessionError::NotFound("zzz".to_string())
        );
    }

    #[test]
    fn test_delete_failure_keeps_event() {
        let mut store = seeded_mock();
        store
            .expect_delete()
            .with(eq("a"))
            .returning(|_| Err(anyhow!("offline")));

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();

        assert!(session.delete("a").is_err());
        assert_eq!(session.events().len(), 2);
    }

    #[test]
    fn test_save_form_timed_range_inserts_each_day() {
        let mut session = CalendarSession::new(LocalStore::new(), "cal-1").with_user("user-1");

        let mut form = session.form_for_new(date("2025-10-08"));
        form.title = "Standup".to_string();
        form.end_date = "2025-10-10".to_string();

        let saved = session.save_form(&form).unwrap();
        let starts: Vec<String> = saved.iter().map(|e| e.start.to_string()).collect();
        assert_eq!(
            starts,
            vec![
                "2025-10-08T09:00:00".to_string(),
                "2025-10-09T09:00:00".to_string(),
                "2025-10-10T09:00:00".to_string(),
            ]
        );
        assert_eq!(session.events().len(), 3);
        assert_eq!(session.events_on(date("2025-10-09")).len(), 1);

        let rows = session.store().select("cal-1").unwrap();
        assert!(rows.iter().all(|row| row.created_by.as_deref() == Some("user-1")));
    }

    #[test]
    fn test_save_form_edit_updates_in_place() {
        let mut genres = GenreRegistry::new();
        let work = Genre::new("Work", "#EF4444");
        let work_id = work.id.clone();
        genres.add(work).unwrap();

        let mut session = CalendarSession::new(LocalStore::new(), "cal-1").with_genres(genres);
        let mut form = session.form_for_new(date("2025-10-08"));
        form.title = "Review".to_string();
        form.genre = work_id.clone();
        let created = session.save_form(&form).unwrap().remove(0);

        let mut edit = session.form_for_edit(&created.id).unwrap();
        assert_eq!(edit.genre, work_id);
        edit.title = "Design review".to_string();
        edit.start_time = "14:00".to_string();
        edit.end_time = "15:30".to_string();
        let updated = session.save_form(&edit).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, created.id);
        assert_eq!(updated[0].color.as_deref(), Some("#EF4444"));
        assert_eq!(session.events().len(), 1);
        assert_eq!(session.events()[0].title, "Design review");
        assert_eq!(session.events()[0].start.to_string(), "2025-10-08T14:00:00");
    }

    #[test]
    fn test_save_form_rejects_blank_title_and_backwards_times() {
        let mut store = MockEventStore::new();
        store.expect_insert().never();
        let mut session = CalendarSession::new(store, "cal-1");

        let mut form = session.form_for_new(date("2025-10-08"));
        assert!(matches!(
            session.save_form(&form).unwrap_err(),
            SessionError::InvalidEvent(_)
        ));

        form.title = "Backwards".to_string();
        form.start_time = "11:00".to_string();
        form.end_time = "10:00".to_string();
        assert!(matches!(
            session.save_form(&form).unwrap_err(),
            SessionError::InvalidEvent(_)
        ));
    }

    #[test]
    fn test_form_for_new_uses_injected_settings() {
        let settings = CalendarSettings {
            default_start_time: "08:00".to_string(),
            default_end_time: "08:30".to_string(),
            ..CalendarSettings::default()
        };
        let session = CalendarSession::new(LocalStore::new(), "cal-1").with_settings(settings);

        let form = session.form_for_new(date("2025-10-08"));
        assert_eq!(form.start_time, "08:00");
        assert_eq!(form.end_time, "08:30");
        assert!(!form.is_editing());
    }

    #[test]
    fn test_form_for_edit_unknown_id() {
        let session = CalendarSession::new(LocalStore::new(), "cal-1");
        assert_eq!(
            session.form_for_edit("missing").unwrap_err(),
            SessionError::NotFound("missing".to_string())
        );
    }

    #[test]
    fn test_save_form_removes_rows_when_a_later_insert_fails() {
        let mut store = MockEventStore::new();
        let mut calls = 0;
        store.expect_insert().times(2).returning(move |mut event| {
            calls += 1;
            if calls == 1 {
                event.id = Some("row-1".to_string());
                Ok(event)
            } else {
                Err(anyhow!("disk full"))
            }
        });
        store
            .expect_delete()
            .with(eq("row-1"))
            .times(1)
            .returning(|_| Ok(()));

        let mut session = CalendarSession::new(store, "cal-1");
        let mut form = session.form_for_new(date("2025-10-08"));
        form.title = "Standup".to_string();
        form.end_date = "2025-10-10".to_string();

        let err = session.save_form(&form).unwrap_err();
        assert!(matches!(err, SessionError::PersistenceFailure(ref msg) if msg.contains("disk full")));
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_save_form_restores_edited_row_when_a_later_insert_fails() {
        let mut store = MockEventStore::new();
        store.expect_select().returning(|_| {
            Ok(vec![stored("a", "2025-10-08T09:00:00", "2025-10-08T10:00:00", false)])
        });
        store
            .expect_update()
            .withf(|id, patch| id == "a" && patch.title.as_deref() == Some("Offsite"))
            .times(1)
            .returning(|_, patch| {
                let mut event = stored("a", "2025-10-08T09:00:00", "2025-10-08T10:00:00", false);
                event.apply_patch(patch);
                Ok(event)
            });
        store
            .expect_update()
            .withf(|id, patch| {
                id == "a"
                    && patch.title.as_deref() == Some("Event a")
                    && patch.end_time == Some(parse_timestamp("2025-10-08T10:00:00").unwrap())
            })
            .times(1)
            .returning(|_, _| Ok(stored("a", "2025-10-08T09:00:00", "2025-10-08T10:00:00", false)));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(anyhow!("quota exceeded")));
        store.expect_delete().never();

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();
        let before = session.events().to_vec();

        let mut form = session.form_for_edit("a").unwrap();
        form.title = "Offsite".to_string();
        form.end_date = "2025-10-09".to_string();

        assert!(matches!(
            session.save_form(&form).unwrap_err(),
            SessionError::PersistenceFailure(_)
        ));
        assert_eq!(session.events(), before.as_slice());
    }

    #[test]
    fn test_reschedule_rejects_mismatched_all_day_flag() {
        let mut store = seeded_mock();
        store.expect_update().never();

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();
        let before = session.events().to_vec();

        let drop = DropGeometry::parse(Some("2025-10-20"), Some("2025-10-21")).unwrap();
        assert!(matches!(
            session.reschedule("a", &drop, true).unwrap_err(),
            SessionError::InvalidEvent(_)
        ));

        let drop = DropGeometry::parse(Some("2025-10-20T09:00:00"), Some("2025-10-20T10:00:00")).unwrap();
        assert!(matches!(
            session.reschedule("b", &drop, false).unwrap_err(),
            SessionError::InvalidEvent(_)
        ));
        assert_eq!(session.events(), before.as_slice());
    }

    #[test]
    fn test_timed_event_across_midnight_cannot_be_resaved_unchanged() {
        let mut store = LocalStore::new();
        let late = Event {
            id: None,
            ..stored("late", "2025-10-08T22:00:00", "2025-10-09T01:00:00", false)
        };
        let late = store.insert(late).unwrap();
        let id = late.id.clone().unwrap();

        let mut session = CalendarSession::new(store, "cal-1");
        session.load().unwrap();

        // The edit form spans two dates, so saving expands it per day and
        // the first day's 22:00 to 01:00 block ends before it starts.
        let form = session.form_for_edit(&id).unwrap();
        assert_eq!(form.start_date, "2025-10-08");
        assert_eq!(form.end_date, "2025-10-09");
        assert!(matches!(
            session.save_form(&form).unwrap_err(),
            SessionError::InvalidEvent(_)
        ));

        assert_eq!(session.store().select("cal-1").unwrap(), vec![late]);
        assert_eq!(session.events().len(), 1);
    }
}
