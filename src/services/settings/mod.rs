// Settings service module
// Persists calendar-wide preferences in the single-row settings table

mod mapper;
mod service;

pub use service::SettingsService;
