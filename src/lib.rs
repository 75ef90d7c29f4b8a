//! Administrative directory for hotel inventory.
//!
//! The server half compiles loosely-typed search parameters into a filter and
//! page window, serves paginated listings and validates create/update
//! requests against SQLite. The [`client`] half keeps a table view, a search
//! box, a page cursor and the create/edit dialogs consistent with the server.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod services;
