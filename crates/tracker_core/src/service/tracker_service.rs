//! Tracker use-case service.
//!
//! # Responsibility
//! - Provide the tracker entry points used by CLI and embedding callers.
//! - Delegate persistence to an `ItemStore` implementation.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Service APIs never bypass store validation or persistence contracts.
//! - Item names never reach the logs.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemStore, RepoResult};
use log::{info, warn};
use std::time::Instant;

/// Use-case wrapper owning one item store.
pub struct TrackerService<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> TrackerService<S> {
    /// Creates a service over the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists `item` and returns it with id and creation time assigned.
    pub fn add(&self, item: &Item) -> RepoResult<Item> {
        let started_at = Instant::now();
        let saved = self.log_failure("item_add", self.store.add(item))?;
        info!(
            "event=item_add module=tracker backend={} status=ok id={} duration_ms={}",
            self.backend(),
            saved.id.unwrap_or_default(),
            started_at.elapsed().as_millis()
        );
        Ok(saved)
    }

    /// Builds an unsaved item from `name` and persists it.
    pub fn add_named(&self, name: impl Into<String>) -> RepoResult<Item> {
        self.add(&Item::new(name))
    }

    pub fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let found = self.log_failure("item_get", self.store.find_by_id(id))?;
        info!(
            "event=item_get module=tracker backend={} status={} id={}",
            self.backend(),
            if found.is_some() { "ok" } else { "not_found" },
            id
        );
        Ok(found)
    }

    pub fn find_all(&self) -> RepoResult<Vec<Item>> {
        let items = self.log_failure("item_list", self.store.find_all())?;
        info!(
            "event=item_list module=tracker backend={} status=ok count={}",
            self.backend(),
            items.len()
        );
        Ok(items)
    }

    /// Case-sensitive substring search over item names.
    pub fn find_by_name(&self, key: &str) -> RepoResult<Vec<Item>> {
        let items = self.log_failure("item_search", self.store.find_by_name(key))?;
        info!(
            "event=item_search module=tracker backend={} status=ok key_len={} count={}",
            self.backend(),
            key.len(),
            items.len()
        );
        Ok(items)
    }

    /// Renames an existing item. Returns `false` when `id` is unknown.
    pub fn replace(&self, id: ItemId, item: &Item) -> RepoResult<bool> {
        let replaced = self.log_failure("item_replace", self.store.replace(id, item))?;
        info!(
            "event=item_replace module=tracker backend={} status={} id={}",
            self.backend(),
            if replaced { "ok" } else { "not_found" },
            id
        );
        Ok(replaced)
    }

    /// Deletes an item; unknown ids are accepted silently.
    pub fn delete(&self, id: ItemId) -> RepoResult<()> {
        self.log_failure("item_delete", self.store.delete(id))?;
        info!(
            "event=item_delete module=tracker backend={} status=ok id={id}",
            self.backend()
        );
        Ok(())
    }

    /// Closes the wrapped store.
    pub fn close(self) -> RepoResult<()> {
        let backend = self.backend();
        let result = self.store.close();
        if let Err(err) = &result {
            warn!("event=store_close module=tracker backend={backend} status=error error={err}");
        }
        result
    }

    fn backend(&self) -> &'static str {
        self.store.backend_name()
    }

    fn log_failure<T>(&self, event: &str, result: RepoResult<T>) -> RepoResult<T> {
        if let Err(err) = &result {
            warn!(
                "event={event} module=tracker backend={} status=error error={err}",
                self.backend()
            );
        }
        result
    }
}
