//! Runtime-selected item store.
//!
//! Wraps the concrete stores so callers that pick a backend from
//! configuration still get the full `ItemStore` contract, including `close`.

use crate::model::item::{Item, ItemId};
use crate::repo::item_repo::{ItemStore, RepoResult, SqliteItemStore};
use crate::repo::memory_repo::MemoryItemStore;

#[derive(Debug)]
pub enum AnyItemStore {
    Sqlite(SqliteItemStore),
    Memory(MemoryItemStore),
}

impl From<SqliteItemStore> for AnyItemStore {
    fn from(value: SqliteItemStore) -> Self {
        Self::Sqlite(value)
    }
}

impl From<MemoryItemStore> for AnyItemStore {
    fn from(value: MemoryItemStore) -> Self {
        Self::Memory(value)
    }
}

impl ItemStore for AnyItemStore {
    fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(store) => store.backend_name(),
            Self::Memory(store) => store.backend_name(),
        }
    }

    fn add(&self, item: &Item) -> RepoResult<Item> {
        match self {
            Self::Sqlite(store) => store.add(item),
            Self::Memory(store) => store.add(item),
        }
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        match self {
            Self::Sqlite(store) => store.find_by_id(id),
            Self::Memory(store) => store.find_by_id(id),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Item>> {
        match self {
            Self::Sqlite(store) => store.find_all(),
            Self::Memory(store) => store.find_all(),
        }
    }

    fn find_by_name(&self, key: &str) -> RepoResult<Vec<Item>> {
        match self {
            Self::Sqlite(store) => store.find_by_name(key),
            Self::Memory(store) => store.find_by_name(key),
        }
    }

    fn replace(&self, id: ItemId, item: &Item) -> RepoResult<bool> {
        match self {
            Self::Sqlite(store) => store.replace(id, item),
            Self::Memory(store) => store.replace(id, item),
        }
    }

    fn delete(&self, id: ItemId) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => store.delete(id),
            Self::Memory(store) => store.delete(id),
        }
    }

    fn close(self) -> RepoResult<()> {
        match self {
            Self::Sqlite(store) => store.close(),
            Self::Memory(store) => store.close(),
        }
    }
}
