//! Tracker domain model.
//!
//! # Responsibility
//! - Define the canonical `Item` record persisted by every store variant.
//!
//! # Invariants
//! - Identity (`id`) and creation time (`created`) are owned by the store.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
