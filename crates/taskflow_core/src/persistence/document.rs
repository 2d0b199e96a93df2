//! Portable export/import documents.
//!
//! # Responsibility
//! - Produce a standalone `{lists, tasks, exportedAt, version}` snapshot.
//! - Validate user-supplied import text before anything is replaced.
//!
//! # Invariants
//! - Exports never carry undo history or allocator state.
//! - An accepted import satisfies the same integrity rules as a persisted
//!   snapshot, and its `next_id` exceeds every imported id.

use super::schema::{max_id, validate_collections};
use crate::model::{BoardList, Task};
use crate::store::BoardStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Version string stamped on every export.
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

const EXPORT_FILE_PREFIX: &str = "taskflow-board";

/// Export document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub lists: Vec<BoardList>,
    pub tasks: Vec<Task>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

impl ExportDocument {
    pub fn capture(store: &BoardStore, now: DateTime<Utc>) -> Self {
        Self {
            lists: store.lists().to_vec(),
            tasks: store.tasks().to_vec(),
            exported_at: now,
            version: EXPORT_FORMAT_VERSION.to_string(),
        }
    }

    /// Renders pretty JSON and a dated file name.
    pub fn render(&self) -> serde_json::Result<ExportedFile> {
        Ok(ExportedFile {
            file_name: format!(
                "{EXPORT_FILE_PREFIX}-{}.json",
                self.exported_at.format("%Y-%m-%d")
            ),
            contents: serde_json::to_string_pretty(self)?,
        })
    }
}

/// Export ready to hand to a view (download, write to disk, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: String,
}

/// Validated import payload awaiting replace confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDocument {
    pub lists: Vec<BoardList>,
    pub tasks: Vec<Task>,
}

impl ImportDocument {
    /// One greater than the largest imported id, or 1 for an empty board.
    pub fn next_id(&self) -> u64 {
        max_id(&self.lists, &self.tasks).saturating_add(1)
    }

    pub fn into_store(self) -> BoardStore {
        let next_id = self.next_id();
        BoardStore::from_parts(self.lists, self.tasks, next_id)
    }
}

/// Import text was rejected.
#[derive(Debug)]
pub enum ImportError {
    /// Not JSON at all.
    Malformed(serde_json::Error),
    /// JSON, but not a board document.
    InvalidFormat(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "import is not valid JSON: {err}"),
            Self::InvalidFormat(reason) => write!(f, "invalid format: {reason}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::InvalidFormat(_) => None,
        }
    }
}

/// Parses import text: shape check first, then typed decode, then
/// integrity checks.
pub fn parse_import(text: &str) -> Result<ImportDocument, ImportError> {
    let root: Value = serde_json::from_str(text).map_err(ImportError::Malformed)?;

    let (raw_lists, raw_tasks) = match (root.get("lists"), root.get("tasks")) {
        (Some(Value::Array(lists)), Some(Value::Array(tasks))) => (lists, tasks),
        _ => {
            return Err(ImportError::InvalidFormat(
                "`lists` and `tasks` must both be present as arrays".to_string(),
            ))
        }
    };

    let lists = raw_lists
        .iter()
        .map(|entry| BoardList::deserialize(entry))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ImportError::InvalidFormat(format!("bad list entry: {err}")))?;
    let tasks = raw_tasks
        .iter()
        .map(|entry| Task::deserialize(entry))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ImportError::InvalidFormat(format!("bad task entry: {err}")))?;

    validate_collections(&lists, &tasks)
        .map_err(|err| ImportError::InvalidFormat(err.to_string()))?;

    Ok(ImportDocument { lists, tasks })
}

#[cfg(test)]
mod tests {
    use super::{parse_import, ImportError};
    use crate::model::MAX_ID;

    #[test]
    fn rejects_non_array_collections() {
        let err = parse_import(r#"{"lists":{},"tasks":[]}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));

        let err = parse_import(r#"{"tasks":[]}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(_)));
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(
            parse_import("not json").unwrap_err(),
            ImportError::Malformed(_)
        ));
    }

    #[test]
    fn empty_board_allocates_from_one() {
        let doc = parse_import(r#"{"lists":[],"tasks":[]}"#).unwrap();
        assert_eq!(doc.next_id(), 1);
    }

    #[test]
    fn rejects_ids_beyond_range() {
        let err = parse_import(
            r#"{"lists":[{"id":18446744073709551615,"title":"Big","position":0}],"tasks":[]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat(ref reason) if reason.contains("exceeds")));
    }

    #[test]
    fn largest_id_allocates_one_past_it() {
        let text = format!(
            r#"{{"lists":[{{"id":{MAX_ID},"title":"Edge","position":0}}],"tasks":[]}}"#
        );
        let doc = parse_import(&text).unwrap();
        assert_eq!(doc.next_id(), MAX_ID + 1);
    }
}
