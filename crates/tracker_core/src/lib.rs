//! Core persistence logic for the item tracker.
//! This crate owns the item store contract and its SQLite and in-memory
//! implementations.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId, ItemValidationError};
pub use repo::any_repo::AnyItemStore;
pub use repo::item_repo::{ItemStore, RepoError, RepoResult, SqliteItemStore};
pub use repo::memory_repo::MemoryItemStore;
pub use service::tracker_service::TrackerService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
