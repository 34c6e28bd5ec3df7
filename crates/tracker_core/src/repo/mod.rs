//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the `ItemStore` data access contract.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Write paths enforce `Item::validate()` before persistence.
//! - "No such item" is expressed as `None`, `false` or a no-op, never as an
//!   error. Errors are reserved for infrastructure and validation failures.

use chrono::{DateTime, SubsecRound, Utc};

pub mod any_repo;
pub mod item_repo;
pub mod memory_repo;

/// Insert timestamp used by every store variant.
///
/// Truncated to milliseconds so that the value survives a round trip through
/// the `INTEGER` epoch-millis column unchanged.
pub(crate) fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
