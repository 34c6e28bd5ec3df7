//! Item store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD contract over tracked items.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT`, so they only ever grow and are never reused.
//! - `created` is stamped by the store inside `add`, never taken from callers.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::repo::current_timestamp;
use chrono::DateTime;
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

const ITEM_SELECT_SQL: &str = "SELECT id, name, created FROM items";
const REQUIRED_TABLE: &str = "items";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "created"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A previous holder of the in-memory store lock panicked.
    LockPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::LockPoisoned => write!(f, "item store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for tracked items.
///
/// Every operation is a single blocking request against the backing storage.
pub trait ItemStore {
    /// Short backend label carried by `backend=` in log events.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new item, assigning a fresh id and the current time.
    ///
    /// Any `id` or `created` carried by `item` is ignored.
    fn add(&self, item: &Item) -> RepoResult<Item>;

    /// Returns the item with `id`, or `None` when there is none.
    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>>;

    /// Returns every item in insertion order.
    fn find_all(&self) -> RepoResult<Vec<Item>>;

    /// Returns items whose name contains `key`, case-sensitive, in insertion
    /// order. Wildcard characters in `key` match literally.
    fn find_by_name(&self, key: &str) -> RepoResult<Vec<Item>>;

    /// Renames the item stored under `id` to `item.name`.
    ///
    /// Returns `false` when no item has that id. Stored `id` and `created`
    /// never change.
    fn replace(&self, id: ItemId, item: &Item) -> RepoResult<bool>;

    /// Removes the item stored under `id`. Missing ids are a no-op.
    fn delete(&self, id: ItemId) -> RepoResult<()>;

    /// Releases the resources held by this store.
    fn close(self) -> RepoResult<()>
    where
        Self: Sized;
}

/// SQLite-backed item store owning exactly one connection.
///
/// `rusqlite::Connection` is not `Sync`, so one instance can never be shared
/// between threads; open one store per unit of work instead.
#[derive(Debug)]
pub struct SqliteItemStore {
    conn: Connection,
}

impl SqliteItemStore {
    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database and migrates it.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `items`
    ///   table does not have the expected shape.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_items(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }
}

impl ItemStore for SqliteItemStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn add(&self, item: &Item) -> RepoResult<Item> {
        item.validate()?;

        let created = current_timestamp();
        self.conn.execute(
            "INSERT INTO items (name, created) VALUES (?1, ?2);",
            params![item.name.as_str(), created.timestamp_millis()],
        )?;
        let id = self.conn.last_insert_rowid();

        debug!(
            "event=item_add module=store backend=sqlite status=ok id={} name_len={}",
            id,
            item.name.len()
        );
        Ok(Item {
            id: Some(id),
            name: item.name.clone(),
            created: Some(created),
        })
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Item>> {
        self.query_items(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"), params![])
    }

    fn find_by_name(&self, key: &str) -> RepoResult<Vec<Item>> {
        // GLOB compares case-sensitively, unlike LIKE which folds ASCII case.
        self.query_items(
            &format!("{ITEM_SELECT_SQL} WHERE name GLOB ?1 ORDER BY id ASC;"),
            [glob_contains_pattern(key)],
        )
    }

    fn replace(&self, id: ItemId, item: &Item) -> RepoResult<bool> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items SET name = ?1 WHERE id = ?2;",
            params![item.name.as_str(), id],
        )?;

        let status = if changed == 0 { "not_found" } else { "ok" };
        debug!("event=item_replace module=store backend=sqlite status={status} id={id}");
        Ok(changed > 0)
    }

    fn delete(&self, id: ItemId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM items WHERE id = ?1;", [id])?;

        let status = if changed == 0 { "noop" } else { "ok" };
        debug!("event=item_delete module=store backend=sqlite status={status} id={id}");
        Ok(())
    }

    fn close(self) -> RepoResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=store backend=sqlite status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=db_close module=store backend=sqlite status=error error={}",
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [REQUIRED_TABLE],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(REQUIRED_TABLE));
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({REQUIRED_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: REQUIRED_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in items.id"
        )));
    }

    let created_ms: i64 = row.get("created")?;
    let created = DateTime::from_timestamp_millis(created_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created value `{created_ms}` in items.created"
        ))
    })?;

    Ok(Item {
        id: Some(id),
        name: row.get("name")?,
        created: Some(created),
    })
}

/// Builds a `GLOB` pattern matching any text that contains `key` literally.
fn glob_contains_pattern(key: &str) -> String {
    let mut pattern = String::with_capacity(key.len() + 2);
    pattern.push('*');
    for ch in key.chars() {
        match ch {
            '*' | '?' | '[' => {
                pattern.push('[');
                pattern.push(ch);
                pattern.push(']');
            }
            _ => pattern.push(ch),
        }
    }
    pattern.push('*');
    pattern
}

#[cfg(test)]
mod tests {
    use super::glob_contains_pattern;

    #[test]
    fn glob_pattern_wraps_plain_key() {
        assert_eq!(glob_contains_pattern("ta"), "*ta*");
        assert_eq!(glob_contains_pattern(""), "**");
    }

    #[test]
    fn glob_pattern_escapes_wildcards() {
        assert_eq!(glob_contains_pattern("a*b?c[d]"), "*a[*]b[?]c[[]d]*");
    }
}
