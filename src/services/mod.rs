// Service module exports

pub mod database;
pub mod event;
pub mod genre;
pub mod session;
pub mod settings;
pub mod store;
