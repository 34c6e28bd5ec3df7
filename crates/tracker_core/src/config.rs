//! Store configuration.
//!
//! # Responsibility
//! - Resolve which item store backend to open and where it lives.
//! - Carry optional logging settings for executables.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolving configuration never touches the filesystem.

use crate::logging::{default_log_level, init_logging};
use crate::repo::any_repo::AnyItemStore;
use crate::repo::item_repo::{RepoResult, SqliteItemStore};
use crate::repo::memory_repo::MemoryItemStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_STORE: &str = "TRACKER_STORE";
pub const ENV_DB_PATH: &str = "TRACKER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TRACKER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TRACKER_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tracker.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => write!(
                f,
                "unsupported {ENV_STORE} value `{value}`; expected sqlite|sqlite-memory|memory"
            ),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// SQLite database file, created on first open.
    SqliteFile(PathBuf),
    /// Private SQLite database dropped with the store.
    SqliteMemory,
    /// Map-backed store without SQL.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::SqliteFile(default_db_path()),
            log_level: None,
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Reads configuration from `TRACKER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend = match read(ENV_STORE).as_deref() {
            None | Some("sqlite") => StoreBackend::SqliteFile(
                read(ENV_DB_PATH).map_or_else(default_db_path, PathBuf::from),
            ),
            Some("sqlite-memory") => StoreBackend::SqliteMemory,
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            backend,
            log_level: read(ENV_LOG_LEVEL),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    /// Opens the configured store.
    pub fn open_store(&self) -> RepoResult<AnyItemStore> {
        let store = match &self.backend {
            StoreBackend::SqliteFile(path) => SqliteItemStore::open(path)?.into(),
            StoreBackend::SqliteMemory => SqliteItemStore::open_in_memory()?.into(),
            StoreBackend::Memory => MemoryItemStore::new().into(),
        };
        Ok(store)
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when no directory is set and logging stays off.
    /// A directory path that is not valid UTF-8 is rejected rather than
    /// rewritten.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let level = self.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir.to_str().ok_or_else(|| {
            ConfigError::Logging(format!(
                "log directory is not valid UTF-8: {}",
                log_dir.display()
            ))
        })?;
        init_logging(level, log_dir).map_err(ConfigError::Logging)?;
        Ok(true)
    }
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreBackend, StoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, ENV_STORE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_sqlite_file_in_temp_dir() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        match config.backend {
            StoreBackend::SqliteFile(path) => assert!(path.starts_with(std::env::temp_dir())),
            other => panic!("unexpected backend: {other:?}"),
        }
    }

    #[test]
    fn explicit_db_path_and_log_level_are_used() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ENV_STORE, " sqlite "),
            (ENV_DB_PATH, "/var/lib/tracker/items.db"),
            (ENV_LOG_LEVEL, "warn"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            StoreBackend::SqliteFile(PathBuf::from("/var/lib/tracker/items.db"))
        );
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[(ENV_STORE, "memory"), (ENV_LOG_LEVEL, "  ")]))
                .unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_STORE, "postgres")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("postgres".to_string()));
    }

    #[test]
    fn init_logging_is_skipped_without_directory() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            log_level: Some("debug".to_string()),
            log_dir: None,
        };
        assert!(!config.init_logging().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn init_logging_rejects_non_utf8_directory() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let config = StoreConfig {
            backend: StoreBackend::Memory,
            log_level: None,
            log_dir: Some(PathBuf::from(OsStr::from_bytes(b"/tmp/tracker-\xff-logs"))),
        };
        match config.init_logging() {
            Err(ConfigError::Logging(message)) => assert!(message.contains("not valid UTF-8")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
