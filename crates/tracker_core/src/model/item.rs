//! Item domain model.
//!
//! # Responsibility
//! - Define the record tracked by the item store.
//! - Validate caller-supplied identity before it reaches persistence.
//!
//! # Invariants
//! - `id` is `None` until the item has been persisted by a store.
//! - A present `id` is always strictly positive.
//! - `created` is assigned by the store on insert and never changes afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate key assigned by the store on insert.
pub type ItemId = i64;

/// Validation errors for caller-constructed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Ids are assigned starting at 1; zero and negative values never exist.
    NonPositiveId(ItemId),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId(id) => write!(f, "item id must be positive, got {id}"),
        }
    }
}

impl Error for ItemValidationError {}

/// Tracked record.
///
/// Items built by callers carry only a name (plus an id for update requests).
/// Items returned by a store always carry both `id` and `created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemWire")]
pub struct Item {
    /// Store-assigned surrogate key.
    pub id: Option<ItemId>,
    /// Free-form display name. Not unique.
    pub name: String,
    /// Insert time, millisecond precision, UTC.
    pub created: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ItemWire {
    id: Option<ItemId>,
    name: String,
    created: Option<DateTime<Utc>>,
}

impl TryFrom<ItemWire> for Item {
    type Error = ItemValidationError;

    fn try_from(value: ItemWire) -> Result<Self, Self::Error> {
        let item = Self {
            id: value.id,
            name: value.name,
            created: value.created,
        };
        item.validate()?;
        Ok(item)
    }
}

impl Item {
    /// Creates an unsaved item carrying only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created: None,
        }
    }

    /// Creates an item request that refers to an existing id.
    ///
    /// Used for replace requests where identity already exists in the store.
    ///
    /// # Errors
    /// - Returns `NonPositiveId` when `id <= 0`.
    pub fn with_id(id: ItemId, name: impl Into<String>) -> Result<Self, ItemValidationError> {
        let item = Self {
            id: Some(id),
            name: name.into(),
            created: None,
        };
        item.validate()?;
        Ok(item)
    }

    /// Checks identity invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        match self.id {
            Some(id) if id <= 0 => Err(ItemValidationError::NonPositiveId(id)),
            _ => Ok(()),
        }
    }

    /// Returns whether a store has assigned identity to this item.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some() && self.created.is_some()
    }
}
