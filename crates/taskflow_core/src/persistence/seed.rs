//! Demo board used when no trustworthy saved state exists.

use crate::model::{BoardList, ListId, Task, TaskId};
use crate::store::BoardStore;
use chrono::{DateTime, Utc};

/// First id handed out after the seed (3 lists + 4 tasks share ids 1..=4).
pub const SEED_NEXT_ID: u64 = 5;

/// Three lists, four tasks, next id 5. Tasks are stamped with `now`.
pub fn seed_board(now: DateTime<Utc>) -> BoardStore {
    let lists = vec![
        BoardList::new(ListId(1), "To Do", 0),
        BoardList::new(ListId(2), "In Progress", 1),
        BoardList::new(ListId(3), "Done", 2),
    ];

    let mut finished = Task::new(
        TaskId(4),
        "Project planning and requirements",
        ListId(3),
        0,
        now,
    )
    .with_description("Define project scope and technical requirements");
    finished.done = true;

    let tasks = vec![
        Task::new(TaskId(1), "Design new landing page", ListId(1), 0, now)
            .with_description("Create wireframes and mockups for the new homepage design"),
        Task::new(TaskId(2), "Set up development environment", ListId(1), 1, now)
            .with_description("Install necessary tools and configure workspace"),
        Task::new(
            TaskId(3),
            "Implement drag and drop functionality",
            ListId(2),
            0,
            now,
        )
        .with_description("Add HTML5 drag and drop API for task management"),
        finished,
    ];

    BoardStore::from_parts(lists, tasks, SEED_NEXT_ID)
}

#[cfg(test)]
mod tests {
    use super::{seed_board, SEED_NEXT_ID};
    use crate::model::TaskId;
    use chrono::{TimeZone, Utc};

    #[test]
    fn seed_matches_demo_board() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = seed_board(now);

        assert_eq!(store.lists().len(), 3);
        assert_eq!(store.tasks().len(), 4);
        assert_eq!(store.next_id(), SEED_NEXT_ID);
        assert_eq!(
            store.task(TaskId(3)).unwrap().description,
            "Add HTML5 drag and drop API for task management"
        );
        assert!(store.task(TaskId(4)).unwrap().done);
    }
}
