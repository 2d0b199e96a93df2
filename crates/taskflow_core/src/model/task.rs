//! Task card model.
//!
//! # Invariants
//! - `list_id` references a live list while the task itself is live.
//! - `position` ranks the task among siblings with the same `list_id`;
//!   equal positions fall back to storage order.

use super::ids::{ListId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work living in exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Free-form details. Absent on the wire means empty.
    #[serde(default)]
    pub description: String,
    pub done: bool,
    pub position: i64,
    pub list_id: ListId,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task with an empty description.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        list_id: ListId,
        position: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            done: false,
            position,
            list_id,
            created_at,
        }
    }

    /// Builder-style description setter, used by seed data and tests.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::ids::{ListId, TaskId};
    use chrono::{TimeZone, Utc};

    #[test]
    fn wire_shape_uses_camel_case_and_defaults_description() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let task = Task::new(TaskId(7), "Ship it", ListId(2), 3, created_at);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["listId"], 2);
        assert_eq!(json["createdAt"], "2024-05-01T08:30:00Z");
        assert_eq!(json["done"], false);

        let decoded: Task = serde_json::from_str(
            r#"{"id":7,"title":"Ship it","done":false,"position":3,"listId":2,"createdAt":"2024-05-01T08:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(decoded, task);
    }
}
