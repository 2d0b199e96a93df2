//! Persistence gateway between board state and the durable slot.
//!
//! # Responsibility
//! - Save the full board (state, history, allocator) to one named slot.
//! - Load that slot, falling back to the demo seed when it is missing or
//!   cannot be trusted.
//! - Build export documents and validate import text.
//!
//! # Invariants
//! - `save` overwrites the slot wholesale.
//! - `load` never fails: a bad slot degrades to the seed, which is
//!   persisted immediately.

use super::document::{parse_import, ExportDocument, ExportedFile, ImportDocument, ImportError};
use super::schema::{decode_snapshot, encode_snapshot};
use super::seed::seed_board;
use crate::history::UndoLog;
use crate::repo::{RepoError, SlotRepository};
use crate::store::BoardStore;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure while writing the slot.
#[derive(Debug)]
pub enum PersistenceError {
    Encode(serde_json::Error),
    Repo(RepoError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode board: {err}"),
            Self::Repo(err) => write!(f, "failed to write board slot: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<RepoError> for PersistenceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Where the loaded board came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Decoded from the slot.
    Restored,
    /// Slot had no payload.
    SeededEmpty,
    /// Slot payload or read failed; the reason is kept for diagnostics.
    SeededAfterError(String),
}

/// Result of `PersistenceGateway::load`.
#[derive(Debug, Clone)]
pub struct LoadedBoard {
    pub store: BoardStore,
    pub history: UndoLog,
    pub origin: LoadOrigin,
}

/// Reads and writes board state through a `SlotRepository`.
pub struct PersistenceGateway<R: SlotRepository> {
    repo: R,
    slot_key: String,
}

impl<R: SlotRepository> PersistenceGateway<R> {
    pub fn new(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            repo,
            slot_key: slot_key.into(),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Overwrites the slot with `store` and `history`.
    pub fn save(&self, store: &BoardStore, history: &UndoLog) -> Result<(), PersistenceError> {
        let started_at = Instant::now();
        let payload = encode_snapshot(store, history)?;
        self.repo.write_slot(&self.slot_key, &payload)?;
        info!(
            "event=board_save module=persistence status=ok lists={} tasks={} history={} bytes={} duration_ms={}",
            store.lists().len(),
            store.tasks().len(),
            history.len(),
            payload.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Loads the slot or seeds (and persists) the demo board.
    pub fn load(&self, now: DateTime<Utc>, history_limit: usize) -> LoadedBoard {
        let origin = match self.repo.read_slot(&self.slot_key) {
            Ok(Some(payload)) => match decode_snapshot(&payload) {
                Ok(snapshot) => {
                    let (store, history) = snapshot.into_state(history_limit);
                    info!(
                        "event=board_load module=persistence status=ok lists={} tasks={} history={} next_id={}",
                        store.lists().len(),
                        store.tasks().len(),
                        history.len(),
                        store.next_id()
                    );
                    return LoadedBoard {
                        store,
                        history,
                        origin: LoadOrigin::Restored,
                    };
                }
                Err(err) => {
                    warn!(
                        "event=board_load module=persistence status=fallback reason=corrupt_slot error={err}"
                    );
                    LoadOrigin::SeededAfterError(err.to_string())
                }
            },
            Ok(None) => {
                info!("event=board_load module=persistence status=fallback reason=missing_slot");
                LoadOrigin::SeededEmpty
            }
            Err(err) => {
                error!(
                    "event=board_load module=persistence status=fallback reason=read_failed error={err}"
                );
                LoadOrigin::SeededAfterError(err.to_string())
            }
        };

        let store = seed_board(now);
        let history = UndoLog::with_capacity(history_limit);
        if let Err(err) = self.save(&store, &history) {
            error!("event=board_seed module=persistence status=error error={err}");
        }
        LoadedBoard {
            store,
            history,
            origin,
        }
    }

    /// Portable snapshot of lists and tasks only.
    pub fn export_document(&self, store: &BoardStore, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::capture(store, now)
    }

    /// Renders an export ready to be written out.
    pub fn export_file(
        &self,
        store: &BoardStore,
        now: DateTime<Utc>,
    ) -> serde_json::Result<ExportedFile> {
        self.export_document(store, now).render()
    }

    /// Validates import text. Nothing is replaced here.
    pub fn import_document(&self, text: &str) -> Result<ImportDocument, ImportError> {
        parse_import(text)
    }
}
