//! In-memory item store.
//!
//! Same contract as the SQLite store, backed by an ordered map. Intended for
//! tests and throwaway sessions; nothing survives `close`.

use crate::model::item::{Item, ItemId};
use crate::repo::current_timestamp;
use crate::repo::item_repo::{ItemStore, RepoError, RepoResult};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<ItemId, Item>,
    // Highest id ever handed out. Never decremented, so ids are not reused.
    last_id: ItemId,
}

/// Map-backed item store; access is serialized by an internal mutex.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    state: Mutex<MemoryState>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl ItemStore for MemoryItemStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn add(&self, item: &Item) -> RepoResult<Item> {
        item.validate()?;

        let mut state = self.lock()?;
        state.last_id += 1;
        let id = state.last_id;
        let stored = Item {
            id: Some(id),
            name: item.name.clone(),
            created: Some(current_timestamp()),
        };
        state.items.insert(id, stored.clone());

        debug!(
            "event=item_add module=store backend=memory status=ok id={} name_len={}",
            id,
            item.name.len()
        );
        Ok(stored)
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<Item>> {
        Ok(self.lock()?.items.values().cloned().collect())
    }

    fn find_by_name(&self, key: &str) -> RepoResult<Vec<Item>> {
        Ok(self
            .lock()?
            .items
            .values()
            .filter(|item| item.name.contains(key))
            .cloned()
            .collect())
    }

    fn replace(&self, id: ItemId, item: &Item) -> RepoResult<bool> {
        item.validate()?;

        let mut state = self.lock()?;
        let replaced = match state.items.get_mut(&id) {
            Some(stored) => {
                stored.name = item.name.clone();
                true
            }
            None => false,
        };

        let status = if replaced { "ok" } else { "not_found" };
        debug!("event=item_replace module=store backend=memory status={status} id={id}");
        Ok(replaced)
    }

    fn delete(&self, id: ItemId) -> RepoResult<()> {
        let removed = self.lock()?.items.remove(&id).is_some();

        let status = if removed { "ok" } else { "noop" };
        debug!("event=item_delete module=store backend=memory status={status} id={id}");
        Ok(())
    }

    fn close(self) -> RepoResult<()> {
        let state = self
            .state
            .into_inner()
            .map_err(|_| RepoError::LockPoisoned)?;
        debug!(
            "event=store_close module=store backend=memory status=ok dropped_items={}",
            state.items.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryItemStore;
    use crate::model::item::Item;
    use crate::repo::item_repo::ItemStore;

    #[test]
    fn ids_are_not_reused_after_deleting_latest() {
        let store = MemoryItemStore::new();
        let first = store.add(&Item::new("first")).unwrap();
        store.delete(first.id.unwrap()).unwrap();

        let second = store.add(&Item::new("second")).unwrap();
        assert!(second.id.unwrap() > first.id.unwrap());
    }

    #[test]
    fn store_is_usable_across_threads() {
        let store = std::sync::Arc::new(MemoryItemStore::new());
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || store.add(&Item::new(format!("item {n}"))).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids: Vec<_> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|item| item.id.unwrap())
            .collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
