// Settings module
// Calendar-wide preferences injected into form initialisation and saves

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::utils::date::parse_time;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarSettings {
    #[serde(skip)]
    pub id: Option<i64>,
    /// Used when a timed form leaves its start time blank (`HH:MM`).
    pub default_start_time: String,
    /// Used when a timed form leaves its end time blank (`HH:MM`).
    pub default_end_time: String,
    /// 0 = Sunday, 1 = Monday
    pub first_day_of_week: u8,
    pub theme_color: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            id: Some(1),
            default_start_time: "09:00".to_string(),
            default_end_time: "10:00".to_string(),
            first_day_of_week: 0, // Sunday
            theme_color: "#1e293b".to_string(),
        }
    }
}

impl CalendarSettings {
    pub fn validate(&self) -> Result<(), String> {
        parse_time(&self.default_start_time)
            .map_err(|_| format!("Invalid default start time: {}", self.default_start_time))?;
        parse_time(&self.default_end_time)
            .map_err(|_| format!("Invalid default end time: {}", self.default_end_time))?;

        if self.first_day_of_week > 6 {
            return Err("First day of week must be between 0 (Sunday) and 6 (Saturday)".to_string());
        }

        let hex = self.theme_color.trim_start_matches('#');
        if !self.theme_color.starts_with('#')
            || hex.len() != 6
            || !hex.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(format!("Invalid theme color: {}", self.theme_color));
        }

        Ok(())
    }

    /// Default start as a time of day, falling back to 09:00 on bad input.
    pub fn default_start(&self) -> NaiveTime {
        parse_time(&self.default_start_time)
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    /// Default end as a time of day, falling back to 10:00 on bad input.
    pub fn default_end(&self) -> NaiveTime {
        parse_time(&self.default_end_time)
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN))
    }

    pub fn week_start(&self) -> Weekday {
        match self.first_day_of_week {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalendarSettings::default();
        assert_eq!(settings.default_start_time, "09:00");
        assert_eq!(settings.default_end_time, "10:00");
        assert_eq!(settings.week_start(), Weekday::Sun);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_time() {
        let settings = CalendarSettings {
            default_start_time: "nine".to_string(),
            ..CalendarSettings::default()
        };
        assert!(settings.validate().unwrap_err().contains("start time"));
    }

    #[test]
    fn test_validate_rejects_bad_theme_color() {
        let settings = CalendarSettings {
            theme_color: "#12345".to_string(),
            ..CalendarSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_week_day() {
        let settings = CalendarSettings {
            first_day_of_week: 7,
            ..CalendarSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_start_falls_back() {
        let settings = CalendarSettings {
            default_start_time: "".to_string(),
            ..CalendarSettings::default()
        };
        assert_eq!(settings.default_start(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let settings: CalendarSettings =
            serde_json::from_str(r#"{"defaultStartTime":"08:30","firstDayOfWeek":1}"#).unwrap();
        assert_eq!(settings.default_start_time, "08:30");
        assert_eq!(settings.default_end_time, "10:00");
        assert_eq!(settings.week_start(), Weekday::Mon);
    }
}
