//! Durable key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Read and overwrite one named text payload per key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `write_slot` fully replaces any prior payload for the key (no merge).
//! - The SQLite implementation only accepts fully migrated connections.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot repository failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Backend cannot be used (for example a poisoned lock).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "slot repository requires table `{table}`")
            }
            Self::Unavailable(message) => write!(f, "slot repository unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Durable key-value storage holding serialized board state.
pub trait SlotRepository {
    /// Returns the payload stored under `key`, if any.
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>>;
    /// Overwrites the payload stored under `key`.
    fn write_slot(&self, key: &str, payload: &str) -> RepoResult<()>;
    /// Removes `key`. Returns whether a payload existed.
    fn delete_slot(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed slot repository. Owns its connection so a board session
/// can hold it for its whole lifetime.
pub struct SqliteSlotRepository {
    conn: Connection,
}

impl SqliteSlotRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `board_slots` is absent.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let actual_version = current_version(&conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'board_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(RepoError::MissingRequiredTable("board_slots"));
        }

        Ok(Self { conn })
    }

    /// Borrow of the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl SlotRepository for SqliteSlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM board_slots WHERE slot_key = ?1;",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO board_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM board_slots WHERE slot_key = ?1;", params![key])?;
        Ok(changed > 0)
    }
}

/// Process-local slot repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemorySlotRepository {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates one slot, e.g. with a hand-written legacy payload.
    pub fn with_slot(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let repo = Self::default();
        if let Ok(mut slots) = repo.slots.lock() {
            slots.insert(key.into(), payload.into());
        }
        repo
    }

    fn lock(&self) -> RepoResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| RepoError::Unavailable("in-memory slot lock poisoned".to_string()))
    }
}

impl SlotRepository for InMemorySlotRepository {
    fn read_slot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write_slot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.lock()?.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn delete_slot(&self, key: &str) -> RepoResult<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }
}
