//! Versioned persisted-slot schema and its validating decode.
//!
//! # Responsibility
//! - Define the JSON shape written to the durable slot.
//! - Reject any payload that would break board invariants once loaded.
//!
//! # Invariants
//! - Decoding fails closed: any structural or integrity problem is an
//!   error, never a partially trusted board.
//! - A payload without `schemaVersion` is read as version 1.
//! - Every id is at most `MAX_ID` and `currentId` at most `MAX_ID + 1`.

use crate::history::{ActionRecord, UndoLog};
use crate::model::{BoardList, ListId, Task, TaskId, MAX_ID};
use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Full persisted board: state plus undo history plus allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBoard {
    #[serde(default = "legacy_schema_version")]
    pub schema_version: u32,
    pub lists: Vec<BoardList>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub action_history: Vec<ActionRecord>,
    #[serde(alias = "nextId")]
    pub current_id: u64,
}

fn legacy_schema_version() -> u32 {
    1
}

impl PersistedBoard {
    /// Captures the current store and history.
    pub fn capture(store: &BoardStore, history: &UndoLog) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lists: store.lists().to_vec(),
            tasks: store.tasks().to_vec(),
            action_history: history.to_records(),
            current_id: store.next_id(),
        }
    }

    /// Splits into a store and an undo log bounded by `history_limit`.
    pub fn into_state(self, history_limit: usize) -> (BoardStore, UndoLog) {
        let store = BoardStore::from_parts(self.lists, self.tasks, self.current_id);
        let history = UndoLog::from_records(self.action_history, history_limit);
        (store, history)
    }
}

/// Collection-level integrity violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    DuplicateListId(ListId),
    DuplicateTaskId(TaskId),
    DanglingTask { task_id: TaskId, list_id: ListId },
    IdOutOfRange(u64),
}

impl Display for IntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateListId(id) => write!(f, "duplicate list id {id}"),
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id {id}"),
            Self::DanglingTask { task_id, list_id } => {
                write!(f, "task {task_id} references missing list {list_id}")
            }
            Self::IdOutOfRange(id) => write!(f, "id {id} exceeds the maximum {MAX_ID}"),
        }
    }
}

impl Error for IntegrityError {}

/// Persisted slot could not be trusted.
#[derive(Debug)]
pub enum SnapshotError {
    Parse(serde_json::Error),
    UnsupportedVersion { found: u32, supported: u32 },
    Integrity(IntegrityError),
    /// `currentId` would hand out an id that is already in use.
    StaleAllocator { current_id: u64, max_id: u64 },
    /// `currentId` lies beyond the allocatable range.
    AllocatorOutOfRange { current_id: u64 },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "unparsable board snapshot: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "board snapshot schema version {found} is newer than supported {supported}"
            ),
            Self::Integrity(err) => write!(f, "inconsistent board snapshot: {err}"),
            Self::StaleAllocator { current_id, max_id } => write!(
                f,
                "board snapshot currentId {current_id} does not exceed max id {max_id}"
            ),
            Self::AllocatorOutOfRange { current_id } => write!(
                f,
                "board snapshot currentId {current_id} exceeds the id range"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Integrity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<IntegrityError> for SnapshotError {
    fn from(value: IntegrityError) -> Self {
        Self::Integrity(value)
    }
}

/// Parses and validates one persisted slot payload.
pub fn decode_snapshot(payload: &str) -> Result<PersistedBoard, SnapshotError> {
    let snapshot: PersistedBoard = serde_json::from_str(payload)?;

    if snapshot.schema_version > SCHEMA_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: snapshot.schema_version,
            supported: SCHEMA_VERSION,
        });
    }

    validate_collections(&snapshot.lists, &snapshot.tasks)?;

    if snapshot.current_id > MAX_ID + 1 {
        return Err(SnapshotError::AllocatorOutOfRange {
            current_id: snapshot.current_id,
        });
    }

    let max_id = max_id(&snapshot.lists, &snapshot.tasks);
    if snapshot.current_id <= max_id {
        return Err(SnapshotError::StaleAllocator {
            current_id: snapshot.current_id,
            max_id,
        });
    }

    Ok(snapshot)
}

/// Serializes the store and history into the slot payload.
pub fn encode_snapshot(store: &BoardStore, history: &UndoLog) -> serde_json::Result<String> {
    serde_json::to_string(&PersistedBoard::capture(store, history))
}

/// Checks id range, id uniqueness and task → list references.
pub fn validate_collections(lists: &[BoardList], tasks: &[Task]) -> Result<(), IntegrityError> {
    let mut list_ids = HashSet::with_capacity(lists.len());
    for list in lists {
        if list.id.get() > MAX_ID {
            return Err(IntegrityError::IdOutOfRange(list.id.get()));
        }
        if !list_ids.insert(list.id) {
            return Err(IntegrityError::DuplicateListId(list.id));
        }
    }

    let mut task_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.id.get() > MAX_ID {
            return Err(IntegrityError::IdOutOfRange(task.id.get()));
        }
        if !task_ids.insert(task.id) {
            return Err(IntegrityError::DuplicateTaskId(task.id));
        }
        if !list_ids.contains(&task.list_id) {
            return Err(IntegrityError::DanglingTask {
                task_id: task.id,
                list_id: task.list_id,
            });
        }
    }
    Ok(())
}

/// Largest id across both collections, `0` when both are empty.
pub fn max_id(lists: &[BoardList], tasks: &[Task]) -> u64 {
    lists
        .iter()
        .map(|list| list.id.get())
        .chain(tasks.iter().map(|task| task.id.get()))
        .max()
        .unwrap_or(0)
}
