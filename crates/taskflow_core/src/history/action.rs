//! Action records: one logged mutation plus the data needed to reverse it.
//!
//! # Responsibility
//! - Define the typed inverse payload for every mutation kind.
//! - Map records to and from the persisted `{id, action, data, timestamp}`
//!   wire shape.
//!
//! # Invariants
//! - Known kinds decode strictly; a malformed payload is a decode error.
//! - Unknown kinds survive a round trip as `Action::Unrecognized` so that
//!   undoing them takes the reported-failure path instead of vanishing.

use crate::model::{BoardList, ListId, Task, TaskId, TaskPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Kind tag of a recognized action record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    AddList,
    UpdateList,
    DeleteList,
    AddTask,
    DeleteTask,
    UpdateTask,
    MoveTask,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddList => "addList",
            Self::UpdateList => "updateList",
            Self::DeleteList => "deleteList",
            Self::AddTask => "addTask",
            Self::DeleteTask => "deleteTask",
            Self::UpdateTask => "updateTask",
            Self::MoveTask => "moveTask",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "addList" => Some(Self::AddList),
            "updateList" => Some(Self::UpdateList),
            "deleteList" => Some(Self::DeleteList),
            "addTask" => Some(Self::AddTask),
            "deleteTask" => Some(Self::DeleteTask),
            "updateTask" => Some(Self::UpdateTask),
            "moveTask" => Some(Self::MoveTask),
            _ => None,
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutation payload with everything needed for inversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddList {
        list: BoardList,
    },
    UpdateList {
        list_id: ListId,
        old_title: String,
        new_title: String,
    },
    /// Holds the exact task snapshot removed by the cascade.
    DeleteList {
        list: BoardList,
        tasks: Vec<Task>,
    },
    AddTask {
        task: Task,
    },
    DeleteTask {
        task: Task,
    },
    /// `previous` is the whole pre-mutation task, not a diff.
    UpdateTask {
        task_id: TaskId,
        previous: Task,
        patch: Option<TaskPatch>,
    },
    MoveTask {
        task_id: TaskId,
        old_list_id: ListId,
        new_list_id: ListId,
        old_position: i64,
        new_position: i64,
    },
    Unrecognized {
        kind: String,
        data: Value,
    },
}

impl Action {
    /// `None` for unrecognized records.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::AddList { .. } => Some(ActionKind::AddList),
            Self::UpdateList { .. } => Some(ActionKind::UpdateList),
            Self::DeleteList { .. } => Some(ActionKind::DeleteList),
            Self::AddTask { .. } => Some(ActionKind::AddTask),
            Self::DeleteTask { .. } => Some(ActionKind::DeleteTask),
            Self::UpdateTask { .. } => Some(ActionKind::UpdateTask),
            Self::MoveTask { .. } => Some(ActionKind::MoveTask),
            Self::Unrecognized { .. } => None,
        }
    }

    /// Wire tag, including the raw tag of unrecognized records.
    pub fn kind_label(&self) -> &str {
        match self {
            Self::Unrecognized { kind, .. } => kind.as_str(),
            other => other.kind().map_or("unknown", ActionKind::as_str),
        }
    }
}

/// One undo log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ActionRecordWire", into = "ActionRecordWire")]
pub struct ActionRecord {
    pub id: String,
    pub action: Action,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ActionRecord {
    /// Stamps `action` with a fresh random id and `now`.
    pub fn new(action: Action, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            timestamp: now.timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActionRecordWire {
    id: String,
    action: String,
    #[serde(default)]
    data: Value,
    timestamp: i64,
}

#[derive(Serialize, Deserialize)]
struct ListPayload {
    list: BoardList,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateListPayload {
    list_id: ListId,
    old_title: String,
    new_title: String,
}

#[derive(Serialize, Deserialize)]
struct DeleteListPayload {
    list: BoardList,
    tasks: Vec<Task>,
}

#[derive(Serialize, Deserialize)]
struct TaskPayload {
    task: Task,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskPayload {
    task_id: TaskId,
    old_task: Task,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    updates: Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveTaskPayload {
    task_id: TaskId,
    old_list_id: ListId,
    new_list_id: ListId,
    old_position: i64,
    new_position: i64,
}

impl TryFrom<ActionRecordWire> for ActionRecord {
    type Error = serde_json::Error;

    fn try_from(wire: ActionRecordWire) -> Result<Self, Self::Error> {
        let ActionRecordWire {
            id,
            action,
            data,
            timestamp,
        } = wire;

        let decoded = match ActionKind::parse(action.as_str()) {
            Some(ActionKind::AddList) => {
                let payload: ListPayload = serde_json::from_value(data)?;
                Action::AddList { list: payload.list }
            }
            Some(ActionKind::UpdateList) => {
                let payload: UpdateListPayload = serde_json::from_value(data)?;
                Action::UpdateList {
                    list_id: payload.list_id,
                    old_title: payload.old_title,
                    new_title: payload.new_title,
                }
            }
            Some(ActionKind::DeleteList) => {
                let payload: DeleteListPayload = serde_json::from_value(data)?;
                Action::DeleteList {
                    list: payload.list,
                    tasks: payload.tasks,
                }
            }
            Some(ActionKind::AddTask) => {
                let payload: TaskPayload = serde_json::from_value(data)?;
                Action::AddTask { task: payload.task }
            }
            Some(ActionKind::DeleteTask) => {
                let payload: TaskPayload = serde_json::from_value(data)?;
                Action::DeleteTask { task: payload.task }
            }
            Some(ActionKind::UpdateTask) => {
                let payload: UpdateTaskPayload = serde_json::from_value(data)?;
                // `updates` is informational; older records carry free-form
                // partial objects that are not a `TaskPatch`.
                Action::UpdateTask {
                    task_id: payload.task_id,
                    previous: payload.old_task,
                    patch: serde_json::from_value(payload.updates).ok(),
                }
            }
            Some(ActionKind::MoveTask) => {
                let payload: MoveTaskPayload = serde_json::from_value(data)?;
                Action::MoveTask {
                    task_id: payload.task_id,
                    old_list_id: payload.old_list_id,
                    new_list_id: payload.new_list_id,
                    old_position: payload.old_position,
                    new_position: payload.new_position,
                }
            }
            None => Action::Unrecognized { kind: action, data },
        };

        Ok(Self {
            id,
            action: decoded,
            timestamp,
        })
    }
}

impl From<ActionRecord> for ActionRecordWire {
    fn from(record: ActionRecord) -> Self {
        let action = record.action.kind_label().to_string();
        let data = match record.action {
            Action::AddList { list } => payload(&ListPayload { list }),
            Action::UpdateList {
                list_id,
                old_title,
                new_title,
            } => payload(&UpdateListPayload {
                list_id,
                old_title,
                new_title,
            }),
            Action::DeleteList { list, tasks } => payload(&DeleteListPayload { list, tasks }),
            Action::AddTask { task } | Action::DeleteTask { task } => {
                payload(&TaskPayload { task })
            }
            Action::UpdateTask {
                task_id,
                previous,
                patch,
            } => payload(&UpdateTaskPayload {
                task_id,
                old_task: previous,
                updates: patch.as_ref().map_or(Value::Null, payload),
            }),
            Action::MoveTask {
                task_id,
                old_list_id,
                new_list_id,
                old_position,
                new_position,
            } => payload(&MoveTaskPayload {
                task_id,
                old_list_id,
                new_list_id,
                old_position,
                new_position,
            }),
            Action::Unrecognized { data, .. } => data,
        };

        Self {
            id: record.id,
            action,
            data,
            timestamp: record.timestamp,
        }
    }
}

// Payload structs hold only strings, integers and timestamps, so
// `to_value` cannot fail for them.
fn payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
