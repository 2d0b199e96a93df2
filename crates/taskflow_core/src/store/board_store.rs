//! Canonical in-memory board state.
//!
//! # Responsibility
//! - Own the list and task collections plus the id allocator.
//! - Provide ordered read projections for views.
//!
//! # Invariants
//! - Read projections sort by `position` with a stable sort, so equal
//!   positions keep storage order.
//! - The store does not enforce referential integrity on write; the
//!   mutation engine and undo inversion are its only writers and check
//!   before they mutate.

use super::id_allocator::IdAllocator;
use crate::model::{BoardList, ListId, Task, TaskId};

/// Owned board state: lists, tasks, next id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStore {
    lists: Vec<BoardList>,
    tasks: Vec<Task>,
    ids: IdAllocator,
}

impl BoardStore {
    /// Builds a store from already-validated collections.
    pub fn from_parts(lists: Vec<BoardList>, tasks: Vec<Task>, next_id: u64) -> Self {
        Self {
            lists,
            tasks,
            ids: IdAllocator::starting_at(next_id),
        }
    }

    /// Lists in storage order.
    pub fn lists(&self) -> &[BoardList] {
        &self.lists
    }

    /// Tasks in storage order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Id the allocator will hand out next.
    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    /// Lists in display order.
    pub fn sorted_lists(&self) -> Vec<&BoardList> {
        let mut lists = self.lists.iter().collect::<Vec<_>>();
        lists.sort_by_key(|list| list.position);
        lists
    }

    /// Tasks of one list in display order.
    pub fn tasks_in_list(&self, list_id: ListId) -> Vec<&Task> {
        let mut tasks = self
            .tasks
            .iter()
            .filter(|task| task.list_id == list_id)
            .collect::<Vec<_>>();
        tasks.sort_by_key(|task| task.position);
        tasks
    }

    pub fn task_count_in(&self, list_id: ListId) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.list_id == list_id)
            .count()
    }

    pub fn list(&self, list_id: ListId) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub fn list_mut(&mut self, list_id: ListId) -> Option<&mut BoardList> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    pub fn contains_list(&self, list_id: ListId) -> bool {
        self.list(list_id).is_some()
    }

    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task(task_id).is_some()
    }

    /// Allocates a fresh list id, `None` once the id range is used up.
    pub fn allocate_list_id(&mut self) -> Option<ListId> {
        self.ids.allocate().map(ListId)
    }

    /// Allocates a fresh task id, `None` once the id range is used up.
    pub fn allocate_task_id(&mut self) -> Option<TaskId> {
        self.ids.allocate().map(TaskId)
    }

    pub fn push_list(&mut self, list: BoardList) {
        self.lists.push(list);
    }

    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn remove_list(&mut self, list_id: ListId) -> Option<BoardList> {
        let index = self.lists.iter().position(|list| list.id == list_id)?;
        Some(self.lists.remove(index))
    }

    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    /// Removes every task of `list_id`, returning them in storage order.
    pub fn remove_tasks_in(&mut self, list_id: ListId) -> Vec<Task> {
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.list_id == list_id);
        self.tasks = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::BoardStore;
    use crate::model::{BoardList, ListId, Task, TaskId};
    use chrono::{TimeZone, Utc};

    fn task(id: u64, list: u64, position: i64) -> Task {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task::new(TaskId(id), format!("t{id}"), ListId(list), position, created_at)
    }

    #[test]
    fn tasks_in_list_sorts_stably_by_position() {
        let store = BoardStore::from_parts(
            vec![BoardList::new(ListId(1), "A", 0)],
            vec![task(3, 1, 1), task(4, 1, 0), task(5, 1, 1), task(6, 2, 0)],
            7,
        );

        let order = store
            .tasks_in_list(ListId(1))
            .into_iter()
            .map(|task| task.id.get())
            .collect::<Vec<_>>();
        assert_eq!(order, vec![4, 3, 5]);
    }

    #[test]
    fn remove_tasks_in_keeps_other_lists() {
        let mut store = BoardStore::from_parts(
            vec![BoardList::new(ListId(1), "A", 0), BoardList::new(ListId(2), "B", 1)],
            vec![task(3, 1, 0), task(4, 2, 0), task(5, 1, 1)],
            6,
        );

        let removed = store.remove_tasks_in(ListId(1));
        assert_eq!(removed.len(), 2);
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, TaskId(4));
    }
}
