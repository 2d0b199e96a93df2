//! Applies the inverse of one action record to the board store.
//!
//! # Invariants
//! - Every precondition is checked before the store is touched, so a
//!   failed inversion leaves the store exactly as it was.
//! - Referential integrity holds after a successful inversion: no task
//!   is left pointing at a missing list.

use super::action::Action;
use crate::model::{ListId, TaskId};
use crate::store::BoardStore;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why an action record could not be inverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoError {
    /// Record kind is not known to this build.
    UnrecognizedAction(String),
    /// Referenced list no longer exists.
    MissingList(ListId),
    /// Referenced task no longer exists.
    MissingTask(TaskId),
    /// Removing the list would orphan tasks.
    ListNotEmpty(ListId),
    /// Re-inserting would duplicate a live list id.
    ListExists(ListId),
    /// Re-inserting would duplicate a live task id.
    TaskExists(TaskId),
}

impl Display for UndoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedAction(kind) => write!(f, "unrecognized action kind `{kind}`"),
            Self::MissingList(id) => write!(f, "list not found: {id}"),
            Self::MissingTask(id) => write!(f, "task not found: {id}"),
            Self::ListNotEmpty(id) => write!(f, "list {id} still has tasks"),
            Self::ListExists(id) => write!(f, "list already exists: {id}"),
            Self::TaskExists(id) => write!(f, "task already exists: {id}"),
        }
    }
}

impl Error for UndoError {}

/// Reverts `action` against `store`.
pub fn invert(action: &Action, store: &mut BoardStore) -> Result<(), UndoError> {
    match action {
        Action::AddList { list } => {
            if !store.contains_list(list.id) {
                return Err(UndoError::MissingList(list.id));
            }
            if store.task_count_in(list.id) > 0 {
                return Err(UndoError::ListNotEmpty(list.id));
            }
            store.remove_list(list.id);
        }
        Action::UpdateList {
            list_id, old_title, ..
        } => {
            let list = store
                .list_mut(*list_id)
                .ok_or(UndoError::MissingList(*list_id))?;
            list.title = old_title.clone();
        }
        Action::DeleteList { list, tasks } => {
            if store.contains_list(list.id) {
                return Err(UndoError::ListExists(list.id));
            }
            if let Some(task) = tasks.iter().find(|task| store.contains_task(task.id)) {
                return Err(UndoError::TaskExists(task.id));
            }
            store.push_list(list.clone());
            for task in tasks {
                store.push_task(task.clone());
            }
        }
        Action::AddTask { task } => {
            store
                .remove_task(task.id)
                .ok_or(UndoError::MissingTask(task.id))?;
        }
        Action::DeleteTask { task } => {
            if store.contains_task(task.id) {
                return Err(UndoError::TaskExists(task.id));
            }
            if !store.contains_list(task.list_id) {
                return Err(UndoError::MissingList(task.list_id));
            }
            store.push_task(task.clone());
        }
        Action::UpdateTask {
            task_id, previous, ..
        } => {
            if !store.contains_list(previous.list_id) {
                return Err(UndoError::MissingList(previous.list_id));
            }
            let task = store
                .task_mut(*task_id)
                .ok_or(UndoError::MissingTask(*task_id))?;
            *task = previous.clone();
        }
        Action::MoveTask {
            task_id,
            old_list_id,
            old_position,
            ..
        } => {
            if !store.contains_list(*old_list_id) {
                return Err(UndoError::MissingList(*old_list_id));
            }
            let task = store
                .task_mut(*task_id)
                .ok_or(UndoError::MissingTask(*task_id))?;
            task.list_id = *old_list_id;
            task.position = *old_position;
        }
        Action::Unrecognized { kind, .. } => {
            return Err(UndoError::UnrecognizedAction(kind.clone()));
        }
    }
    Ok(())
}
