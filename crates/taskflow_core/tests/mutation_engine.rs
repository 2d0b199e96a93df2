mod common;

use common::{list_rows, open_seeded, task_rows};
use taskflow_core::{ListId, Severity, TaskId, TaskPatch};

#[test]
fn create_task_appends_to_end_of_list() {
    let (mut service, clock) = open_seeded();
    clock.advance(chrono::Duration::minutes(5));

    let task_id = service.create_task("  Write docs ", ListId(2)).unwrap();

    assert_eq!(task_id, TaskId(5));
    let task = service.store().task(task_id).unwrap();
    assert_eq!(task.title, "Write docs");
    assert_eq!(task.position, 1);
    assert_eq!(task.description, "");
    assert!(!task.done);
    assert_eq!(task.created_at, common::fixed_now() + chrono::Duration::minutes(5));
    assert_eq!(service.store().next_id(), 6);
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.view().titles(), vec!["Task created"]);
}

#[test]
fn lists_and_tasks_share_one_id_sequence() {
    let (mut service, _clock) = open_seeded();

    let list_id = service.create_list("Backlog").unwrap();
    let task_id = service.create_task("First", list_id).unwrap();
    let second_list = service.create_list("Later").unwrap();

    assert_eq!(list_id, ListId(5));
    assert_eq!(task_id, TaskId(6));
    assert_eq!(second_list, ListId(7));
    assert_eq!(service.store().list(list_id).unwrap().position, 3);
    assert_eq!(service.store().list(second_list).unwrap().position, 4);
}

#[test]
fn blank_titles_and_unknown_ids_are_silent_noops() {
    let (mut service, _clock) = open_seeded();
    let lists_before = list_rows(service.store());
    let tasks_before = task_rows(service.store());
    let next_id_before = service.store().next_id();

    assert_eq!(service.create_list("   "), None);
    assert_eq!(service.create_task("", ListId(1)), None);
    assert_eq!(service.create_task("orphan", ListId(42)), None);
    assert!(!service.update_list_title(ListId(42), "Nope"));
    assert!(!service.update_list_title(ListId(1), "  "));
    assert!(!service.update_list_title(ListId(1), "To Do"));
    assert!(!service.update_task(TaskId(42), TaskPatch::DoneToggle));
    assert!(!service.delete_task(TaskId(42)));
    assert!(service.delete_list(ListId(42)).is_skipped());

    assert_eq!(list_rows(service.store()), lists_before);
    assert_eq!(task_rows(service.store()), tasks_before);
    assert_eq!(service.store().next_id(), next_id_before);
    assert!(service.history().is_empty());
    assert!(service.view().notices.is_empty());
}

#[test]
fn update_list_title_trims_and_records() {
    let (mut service, _clock) = open_seeded();

    assert!(service.update_list_title(ListId(2), "  Doing "));

    assert_eq!(service.store().list(ListId(2)).unwrap().title, "Doing");
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.view().titles(), vec!["List updated"]);
}

#[test]
fn update_task_that_changes_nothing_is_not_recorded() {
    let (mut service, _clock) = open_seeded();

    let unchanged = service.update_task(
        TaskId(1),
        TaskPatch::TitleChange {
            title: " Design new landing page ".to_string(),
        },
    );

    assert!(!unchanged);
    assert!(service.history().is_empty());
}

#[test]
fn done_toggle_raises_matching_notices() {
    let (mut service, _clock) = open_seeded();

    assert!(service.update_task(TaskId(1), TaskPatch::DoneToggle));
    assert!(service.store().task(TaskId(1)).unwrap().done);
    assert!(service.update_task(TaskId(1), TaskPatch::SetDone { done: false }));
    assert!(!service.store().task(TaskId(1)).unwrap().done);

    assert_eq!(
        service.view().titles(),
        vec!["Task marked as done", "Task marked as undone"]
    );
}

#[test]
fn description_edit_has_no_notice_but_is_recorded() {
    let (mut service, _clock) = open_seeded();

    assert!(service.update_task(
        TaskId(2),
        TaskPatch::DescriptionChange {
            description: " new notes ".to_string()
        }
    ));

    assert_eq!(service.store().task(TaskId(2)).unwrap().description, "new notes");
    assert_eq!(service.history().len(), 1);
    assert!(service.view().notices.is_empty());
    assert_eq!(service.view().last_history_len, 1);
}

#[test]
fn list_move_patch_requires_existing_target() {
    let (mut service, _clock) = open_seeded();

    let moved = service.update_task(
        TaskId(1),
        TaskPatch::ListMove {
            list_id: ListId(99),
            position: 0,
        },
    );
    assert!(!moved);
    assert_eq!(service.store().task(TaskId(1)).unwrap().list_id, ListId(1));

    assert!(service.update_task(
        TaskId(1),
        TaskPatch::ListMove {
            list_id: ListId(2),
            position: -3,
        },
    ));
    let task = service.store().task(TaskId(1)).unwrap();
    assert_eq!(task.list_id, ListId(2));
    assert_eq!(task.position, 0);
}

#[test]
fn move_task_appends_without_shifting_siblings() {
    let (mut service, _clock) = open_seeded();

    assert!(service.move_task(TaskId(1), ListId(3)));

    let moved = service.store().task(TaskId(1)).unwrap();
    assert_eq!(moved.list_id, ListId(3));
    assert_eq!(moved.position, 1);
    // The remaining task in list 1 keeps its old rank.
    assert_eq!(service.store().task(TaskId(2)).unwrap().position, 1);
    assert_eq!(service.view().titles(), vec!["Task moved"]);
}

#[test]
fn move_to_same_or_missing_list_is_noop() {
    let (mut service, _clock) = open_seeded();

    assert!(!service.move_task(TaskId(3), ListId(2)));
    assert!(!service.move_task(TaskId(3), ListId(77)));
    assert!(!service.move_task(TaskId(77), ListId(1)));
    assert!(service.history().is_empty());
}

#[test]
fn delete_task_removes_it() {
    let (mut service, _clock) = open_seeded();

    assert!(service.delete_task(TaskId(3)));
    assert!(!service.store().contains_task(TaskId(3)));
    assert!(!service.delete_task(TaskId(3)));
    assert_eq!(service.history().len(), 1);
    assert_eq!(service.view().titles(), vec!["Task deleted"]);
}

#[test]
fn every_applied_mutation_refreshes_the_view() {
    let (mut service, _clock) = open_seeded();
    let after_open = service.view().refreshes;

    service.create_list("A");
    service.create_task("t", ListId(1));
    service.delete_task(TaskId(2));

    assert_eq!(service.view().refreshes, after_open + 3);
    assert!(service
        .view()
        .notices
        .iter()
        .all(|notice| notice.severity == Severity::Success));
    assert!(service
        .view()
        .notices
        .iter()
        .all(|notice| notice.ttl == std::time::Duration::from_millis(4_000)));
}

#[test]
fn created_ids_are_strictly_increasing() {
    let (mut service, _clock) = open_seeded();
    let mut previous = 0;

    for round in 0..10 {
        let list_id = service.create_list(&format!("L{round}")).unwrap();
        let task_id = service.create_task("t", list_id).unwrap();
        assert!(list_id.get() > previous);
        assert!(task_id.get() > list_id.get());
        previous = task_id.get();
    }
}
