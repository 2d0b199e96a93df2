mod common;

use common::{open_seeded, task_rows};
use taskflow_core::{ConfirmationPrompt, ListId, Outcome};

#[test]
fn empty_list_is_deleted_without_confirmation() {
    let (mut service, _clock) = open_seeded();
    let list_id = service.create_list("Scratch").unwrap();

    let outcome = service.delete_list(list_id);

    assert!(outcome.is_applied());
    assert!(!service.store().contains_list(list_id));
    assert_eq!(service.view().last_notice().unwrap().title, "List deleted");
}

#[test]
fn non_empty_list_needs_confirmation_and_cascades() {
    let (mut service, _clock) = open_seeded();

    let ticket = service.delete_list(ListId(1)).into_ticket().unwrap();
    assert_eq!(
        ticket.prompt(),
        &ConfirmationPrompt::DeleteList {
            list_id: ListId(1),
            title: "To Do".to_string(),
            task_count: 2,
        }
    );
    // Nothing happens until the ticket is resolved.
    assert!(service.store().contains_list(ListId(1)));
    assert!(service.history().is_empty());

    assert!(service.confirm(ticket).is_applied());
    assert!(!service.store().contains_list(ListId(1)));
    assert_eq!(service.store().task_count_in(ListId(1)), 0);
    assert_eq!(service.store().tasks().len(), 2);
    assert_eq!(service.history().len(), 1);
}

#[test]
fn declined_delete_changes_nothing_and_stays_quiet() {
    let (mut service, _clock) = open_seeded();
    let before = task_rows(service.store());

    let ticket = service.delete_list(ListId(2)).into_ticket().unwrap();
    service.decline(ticket);

    assert_eq!(task_rows(service.store()), before);
    assert!(service.store().contains_list(ListId(2)));
    assert!(service.history().is_empty());
    assert!(service.view().notices.is_empty());
}

#[test]
fn dropped_ticket_is_a_decline() {
    let (mut service, _clock) = open_seeded();

    let outcome = service.delete_list(ListId(2));
    assert!(matches!(outcome, Outcome::NeedsConfirmation(_)));
    drop(outcome);

    assert!(service.store().contains_list(ListId(2)));
    assert!(service.history().is_empty());
}

#[test]
fn stale_ticket_is_skipped() {
    let (mut service, _clock) = open_seeded();

    let first = service.delete_list(ListId(3)).into_ticket().unwrap();
    let second = service.delete_list(ListId(3)).into_ticket().unwrap();
    assert_ne!(first.id(), second.id());

    assert!(service.confirm(first).is_applied());
    assert!(service.confirm(second).is_skipped());
    assert_eq!(service.history().len(), 1);
}

#[test]
fn prompts_have_readable_messages() {
    let (mut service, _clock) = open_seeded();

    let ticket = service.delete_list(ListId(1)).into_ticket().unwrap();
    assert_eq!(ticket.prompt().message(), "Delete \"To Do\" and all its tasks?");
    service.decline(ticket);
}
