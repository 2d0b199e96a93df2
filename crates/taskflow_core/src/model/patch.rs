//! Typed field-level task updates.
//!
//! # Responsibility
//! - Enumerate every way a task can be edited in place.
//! - Normalize user input (trim, clamp) before it reaches the store.
//!
//! # Invariants
//! - Applying a patch never changes `id` or `created_at`.
//! - A blank title never replaces an existing title.

use super::ids::ListId;
use super::task::Task;
use serde::{Deserialize, Serialize};

/// One field-level edit applied by `BoardService::update_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TaskPatch {
    TitleChange {
        title: String,
    },
    DescriptionChange {
        description: String,
    },
    DoneToggle,
    SetDone {
        done: bool,
    },
    /// Combined title/description edit committed by the autosave draft.
    DetailsChange {
        title: String,
        description: String,
    },
    /// Re-parent and re-rank in one step.
    ListMove {
        #[serde(rename = "listId")]
        list_id: ListId,
        position: i64,
    },
}

impl TaskPatch {
    /// Returns a patched copy of `task`. The input is left untouched so the
    /// caller can compare before/after and keep the original as undo data.
    pub fn apply(&self, task: &Task) -> Task {
        let mut next = task.clone();
        match self {
            Self::TitleChange { title } => {
                if let Some(title) = normalize_title(title) {
                    next.title = title;
                }
            }
            Self::DescriptionChange { description } => {
                next.description = description.trim().to_string();
            }
            Self::DoneToggle => next.done = !task.done,
            Self::SetDone { done } => next.done = *done,
            Self::DetailsChange { title, description } => {
                if let Some(title) = normalize_title(title) {
                    next.title = title;
                }
                next.description = description.trim().to_string();
            }
            Self::ListMove { list_id, position } => {
                next.list_id = *list_id;
                next.position = (*position).max(0);
            }
        }
        next
    }

    /// Target list of a `ListMove`, used for referential checks.
    pub fn target_list(&self) -> Option<ListId> {
        match self {
            Self::ListMove { list_id, .. } => Some(*list_id),
            _ => None,
        }
    }

    /// Whether this patch flips the completion flag.
    pub fn touches_done(&self) -> bool {
        matches!(self, Self::DoneToggle | Self::SetDone { .. })
    }
}

/// Trims a title, returning `None` when nothing is left.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, TaskPatch};
    use crate::model::ids::{ListId, TaskId};
    use crate::model::task::Task;
    use chrono::{TimeZone, Utc};

    fn sample() -> Task {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task::new(TaskId(1), "Draft", ListId(1), 2, created_at).with_description("notes")
    }

    #[test]
    fn blank_title_keeps_existing_title() {
        let task = sample();
        let patched = TaskPatch::DetailsChange {
            title: "   ".to_string(),
            description: "  fresh  ".to_string(),
        }
        .apply(&task);
        assert_eq!(patched.title, "Draft");
        assert_eq!(patched.description, "fresh");
    }

    #[test]
    fn list_move_clamps_negative_position() {
        let patched = TaskPatch::ListMove {
            list_id: ListId(9),
            position: -4,
        }
        .apply(&sample());
        assert_eq!(patched.list_id, ListId(9));
        assert_eq!(patched.position, 0);
    }

    #[test]
    fn done_toggle_flips_flag() {
        let task = sample();
        let once = TaskPatch::DoneToggle.apply(&task);
        assert!(once.done);
        assert!(!TaskPatch::DoneToggle.apply(&once).done);
    }

    #[test]
    fn patch_wire_form_is_tagged() {
        let json = serde_json::to_value(TaskPatch::ListMove {
            list_id: ListId(3),
            position: 1,
        })
        .unwrap();
        assert_eq!(json["kind"], "listMove");
        assert_eq!(json["listId"], 3);
    }

    #[test]
    fn normalize_title_trims_and_rejects_blank() {
        assert_eq!(normalize_title("  a  ").as_deref(), Some("a"));
        assert_eq!(normalize_title("\t\n"), None);
    }
}
