// Date utility functions
// Local-naive date/time arithmetic: no timezone is ever consulted except
// when asking for "today".

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::error::EventTimeError;

/// Storage/display format for a calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for a local-naive timestamp (no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Form widget format for a time of day.
pub const TIME_FORMAT: &str = "%H:%M";

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> Result<NaiveDate, EventTimeError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| EventTimeError::InvalidDate(value.to_string()))
}

/// Parse an `HH:MM` (or `HH:MM:SS`) string.
pub fn parse_time(value: &str) -> Result<NaiveTime, EventTimeError> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S"))
        .map_err(|_| EventTimeError::InvalidTime(value.to_string()))
}

/// Parse a local-naive timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM`, and a bare
/// `YYYY-MM-DD` (read as midnight).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, EventTimeError> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        .or_else(|_| parse_date(trimmed).map(start_of_day))
        .map_err(|_| EventTimeError::InvalidTimestamp(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Format the time of day as `HH:MM`.
pub fn format_time(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}

/// Long date for headings, e.g. `2025年10月8日水曜日`.
pub fn format_date_for_display(date: NaiveDate) -> String {
    format!(
        "{}年{}月{}日{}",
        date.year(),
        date.month(),
        date.day(),
        weekday_label(date.weekday())
    )
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "日曜日",
        Weekday::Mon => "月曜日",
        Weekday::Tue => "火曜日",
        Weekday::Wed => "水曜日",
        Weekday::Thu => "木曜日",
        Weekday::Fri => "金曜日",
        Weekday::Sat => "土曜日",
    }
}

/// Shift a date by `days` calendar days, rolling over months and years.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, EventTimeError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| EventTimeError::InvalidDate(format_date(date)))
}

pub fn next_day(date: NaiveDate) -> Result<NaiveDate, EventTimeError> {
    add_days(date, 1)
}

pub fn previous_day(date: NaiveDate) -> Result<NaiveDate, EventTimeError> {
    add_days(date, -1)
}

/// Number of calendar days from `start` to `end` (negative when `end` is earlier).
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_string() -> String {
    format_date(today())
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable second of the day (`23:59:59`), used as the
/// inclusive end of all-day events.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN + Duration::seconds(SECONDS_PER_DAY - 1))
}

/// Calculate the start of the week containing the given date.
pub fn get_week_start(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let first = week_starts_on.num_days_from_sunday() as i64;
    let offset = (weekday - first + 7) % 7;
    date - Duration::days(offset)
}
