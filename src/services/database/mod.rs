//! SQLite connection and schema management for the shared store.

mod connection;
pub mod migrations;
mod schema;

pub use connection::Database;
