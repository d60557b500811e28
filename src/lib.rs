// Shared Calendar Library
// Event time model, stores and the calendar session

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
