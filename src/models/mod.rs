// Module exports for models

pub mod display;
pub mod event;
pub mod form;
pub mod genre;
pub mod settings;
