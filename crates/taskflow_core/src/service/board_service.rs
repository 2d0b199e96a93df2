//! Mutation engine for the board.
//!
//! # Responsibility
//! - Be the only writer of the `BoardStore`.
//! - Record an inverse for every applied mutation and replay it on undo.
//! - Persist, refresh the view and raise notices after each change.
//! - Gate destructive operations behind `ConfirmationTicket`s.
//!
//! # Invariants
//! - Validation failures (blank titles, unknown ids, redundant moves) are
//!   silent no-ops: no state change, no record, no notice.
//! - Persistence failures are logged and never surfaced to the caller.
//! - An undo record is consumed even when its inversion fails.

use super::autosave::{AutosaveScheduler, TaskDraft};
use super::confirmation::{ConfirmationPrompt, ConfirmationTicket, Outcome, PendingAction};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::history::{invert, Action, ActionKind, ActionRecord, UndoError, UndoLog};
use crate::model::{normalize_title, BoardList, ListId, Task, TaskId, TaskPatch};
use crate::persistence::{
    ExportedFile, ImportDocument, ImportError, LoadOrigin, PersistenceGateway,
};
use crate::repo::SlotRepository;
use crate::store::BoardStore;
use crate::view::{BoardView, Notice};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Owns the board for one session, from `open` to `close`.
pub struct BoardService<R: SlotRepository, V: BoardView> {
    store: BoardStore,
    history: UndoLog,
    gateway: PersistenceGateway<R>,
    view: V,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    autosave: AutosaveScheduler,
    load_origin: LoadOrigin,
    next_ticket_id: u64,
}

impl<R: SlotRepository, V: BoardView> BoardService<R, V> {
    /// Loads the board from `repo` (seeding it when needed) and renders it.
    pub fn open(repo: R, view: V, config: EngineConfig) -> Self {
        Self::open_with_clock(repo, view, config, Box::new(SystemClock))
    }

    pub fn open_with_clock(repo: R, view: V, config: EngineConfig, clock: Box<dyn Clock>) -> Self {
        let gateway = PersistenceGateway::new(repo, config.slot_key.clone());
        let loaded = gateway.load(clock.now(), config.history_limit);
        info!(
            "event=board_open module=engine status=ok origin={:?} lists={} tasks={}",
            loaded.origin,
            loaded.store.lists().len(),
            loaded.store.tasks().len()
        );

        let mut service = Self {
            store: loaded.store,
            history: loaded.history,
            gateway,
            view,
            autosave: AutosaveScheduler::new(config.autosave_delay()),
            config,
            clock,
            load_origin: loaded.origin,
            next_ticket_id: 1,
        };
        service.refresh();
        service
    }

    /// Ends the session: drops any pending draft, saves once more and
    /// hands back the repository and view.
    pub fn close(mut self) -> (R, V) {
        if let Some(draft) = self.autosave.cancel() {
            debug!(
                "event=autosave_drop module=engine status=ok task_id={}",
                draft.task_id
            );
        }
        self.persist();
        info!("event=board_close module=engine status=ok");
        (self.gateway.into_repository(), self.view)
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn repository(&self) -> &R {
        self.gateway.repository()
    }

    /// How the board was obtained when the session opened.
    pub fn load_origin(&self) -> &LoadOrigin {
        &self.load_origin
    }

    /// Whether an undo is available.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Appends a list at the end of the board.
    pub fn create_list(&mut self, title: &str) -> Option<ListId> {
        let Some(title) = normalize_title(title) else {
            debug!("event=list_create module=engine status=skip reason=blank_title");
            return None;
        };

        let Some(list_id) = self.store.allocate_list_id() else {
            self.refuse_exhausted("list_create");
            return None;
        };
        let position = self.store.lists().len() as i64;
        let list = BoardList::new(list_id, title, position);
        self.store.push_list(list.clone());
        info!(
            "event=list_create module=engine status=ok list_id={} position={}",
            list_id, position
        );

        self.commit(
            Action::AddList { list },
            Some(self.success("List created", "New list has been added to your board.")),
        );
        Some(list_id)
    }

    pub fn update_list_title(&mut self, list_id: ListId, title: &str) -> bool {
        let Some(new_title) = normalize_title(title) else {
            debug!(
                "event=list_update module=engine status=skip reason=blank_title list_id={}",
                list_id
            );
            return false;
        };
        let Some(list) = self.store.list_mut(list_id) else {
            debug!(
                "event=list_update module=engine status=skip reason=not_found list_id={}",
                list_id
            );
            return false;
        };
        if list.title == new_title {
            return false;
        }

        let old_title = std::mem::replace(&mut list.title, new_title.clone());
        info!("event=list_update module=engine status=ok list_id={}", list_id);
        self.commit(
            Action::UpdateList {
                list_id,
                old_title,
                new_title,
            },
            Some(self.success("List updated", "List title has been updated.")),
        );
        true
    }

    /// Deletes a list and its tasks. Non-empty lists need confirmation.
    pub fn delete_list(&mut self, list_id: ListId) -> Outcome {
        let Some(list) = self.store.list(list_id) else {
            debug!(
                "event=list_delete module=engine status=skip reason=not_found list_id={}",
                list_id
            );
            return Outcome::Skipped;
        };

        let task_count = self.store.task_count_in(list_id);
        if task_count == 0 {
            return self.apply_delete_list(list_id);
        }

        let prompt = ConfirmationPrompt::DeleteList {
            list_id,
            title: list.title.clone(),
            task_count,
        };
        info!(
            "event=list_delete module=engine status=pending list_id={} tasks={}",
            list_id, task_count
        );
        Outcome::NeedsConfirmation(self.issue_ticket(prompt, PendingAction::DeleteList(list_id)))
    }

    /// Appends a task to the end of `list_id`.
    pub fn create_task(&mut self, title: &str, list_id: ListId) -> Option<TaskId> {
        let Some(title) = normalize_title(title) else {
            debug!("event=task_create module=engine status=skip reason=blank_title");
            return None;
        };
        if !self.store.contains_list(list_id) {
            debug!(
                "event=task_create module=engine status=skip reason=list_not_found list_id={}",
                list_id
            );
            return None;
        }

        let Some(task_id) = self.store.allocate_task_id() else {
            self.refuse_exhausted("task_create");
            return None;
        };
        let position = self.store.task_count_in(list_id) as i64;
        let task = Task::new(task_id, title, list_id, position, self.clock.now());
        self.store.push_task(task.clone());
        info!(
            "event=task_create module=engine status=ok task_id={} list_id={} position={}",
            task_id, list_id, position
        );

        self.commit(
            Action::AddTask { task },
            Some(self.success("Task created", "New task has been added to the list.")),
        );
        Some(task_id)
    }

    /// Applies one typed edit. Unchanged results are no-ops.
    pub fn update_task(&mut self, task_id: TaskId, patch: TaskPatch) -> bool {
        if let Some(target) = patch.target_list() {
            if !self.store.contains_list(target) {
                debug!(
                    "event=task_update module=engine status=skip reason=list_not_found task_id={} list_id={}",
                    task_id, target
                );
                return false;
            }
        }
        let Some(task) = self.store.task_mut(task_id) else {
            debug!(
                "event=task_update module=engine status=skip reason=not_found task_id={}",
                task_id
            );
            return false;
        };

        let next = patch.apply(task);
        if next == *task {
            return false;
        }
        let previous = std::mem::replace(task, next);
        let done = task.done;
        info!(
            "event=task_update module=engine status=ok task_id={} done={}",
            task_id, done
        );

        let notice = if !patch.touches_done() {
            None
        } else if done {
            Some(self.success("Task marked as done", "Task has been marked as completed."))
        } else {
            Some(self.success("Task marked as undone", "Task has been unmarked as completed."))
        };
        self.commit(
            Action::UpdateTask {
                task_id,
                previous,
                patch: Some(patch),
            },
            notice,
        );
        true
    }

    pub fn delete_task(&mut self, task_id: TaskId) -> bool {
        let Some(task) = self.store.remove_task(task_id) else {
            debug!(
                "event=task_delete module=engine status=skip reason=not_found task_id={}",
                task_id
            );
            return false;
        };

        info!(
            "event=task_delete module=engine status=ok task_id={} list_id={}",
            task_id, task.list_id
        );
        self.commit(
            Action::DeleteTask { task },
            Some(self.success("Task deleted", "Task has been permanently deleted.")),
        );
        true
    }

    /// Moves a task to the end of another list. Siblings are not shifted.
    pub fn move_task(&mut self, task_id: TaskId, target_list_id: ListId) -> bool {
        if !self.store.contains_list(target_list_id) {
            debug!(
                "event=task_move module=engine status=skip reason=list_not_found list_id={}",
                target_list_id
            );
            return false;
        }
        let new_position = self.store.task_count_in(target_list_id) as i64;
        let Some(task) = self.store.task_mut(task_id) else {
            debug!(
                "event=task_move module=engine status=skip reason=not_found task_id={}",
                task_id
            );
            return false;
        };
        if task.list_id == target_list_id {
            return false;
        }

        let old_list_id = std::mem::replace(&mut task.list_id, target_list_id);
        let old_position = std::mem::replace(&mut task.position, new_position);
        info!(
            "event=task_move module=engine status=ok task_id={} from={} to={} position={}",
            task_id, old_list_id, target_list_id, new_position
        );

        self.commit(
            Action::MoveTask {
                task_id,
                old_list_id,
                new_list_id: target_list_id,
                old_position,
                new_position,
            },
            Some(self.success("Task moved", "Task has been moved to another list.")),
        );
        true
    }

    /// Pops the newest record and reverts it.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. On error the record
    /// is gone and the store is unchanged.
    pub fn undo_last_action(&mut self) -> Result<Option<ActionKind>, UndoError> {
        let Some(record) = self.history.pop() else {
            debug!("event=undo module=engine status=skip reason=empty_history");
            return Ok(None);
        };

        let result = match record.action.kind() {
            Some(kind) => invert(&record.action, &mut self.store).map(|()| kind),
            None => Err(UndoError::UnrecognizedAction(
                record.action.kind_label().to_string(),
            )),
        };

        match result {
            Ok(kind) => {
                info!(
                    "event=undo module=engine status=ok kind={} record_id={}",
                    kind, record.id
                );
                self.finish(Some(self.success("Action undone", "Last action has been undone.")));
                Ok(Some(kind))
            }
            Err(err) => {
                warn!(
                    "event=undo module=engine status=error kind={} record_id={} error={}",
                    record.action.kind_label(),
                    record.id,
                    err
                );
                self.finish(Some(self.failure("Undo failed", "Failed to undo the last action.")));
                Err(err)
            }
        }
    }

    /// Renders the portable export document.
    pub fn export_board(&mut self) -> serde_json::Result<ExportedFile> {
        let file = self.gateway.export_file(&self.store, self.clock.now())?;
        info!(
            "event=board_export module=engine status=ok lists={} tasks={} bytes={}",
            self.store.lists().len(),
            self.store.tasks().len(),
            file.contents.len()
        );
        let notice = self.success(
            "Board exported",
            "Your board data has been exported as a JSON file.",
        );
        self.view.notify(&notice);
        Ok(file)
    }

    /// Validates `contents` and asks to replace the board with it.
    ///
    /// Invalid input raises an error notice and leaves the board alone.
    pub fn import_board(&mut self, contents: &str) -> Result<ConfirmationTicket, ImportError> {
        let document = match self.gateway.import_document(contents) {
            Ok(document) => document,
            Err(err) => {
                warn!("event=board_import module=engine status=error error={err}");
                let notice = self.failure(
                    "Import failed",
                    "Failed to import board. Please check the file format.",
                );
                self.view.notify(&notice);
                return Err(err);
            }
        };

        let prompt = ConfirmationPrompt::ReplaceBoard {
            list_count: document.lists.len(),
            task_count: document.tasks.len(),
        };
        info!(
            "event=board_import module=engine status=pending lists={} tasks={}",
            document.lists.len(),
            document.tasks.len()
        );
        Ok(self.issue_ticket(prompt, PendingAction::ReplaceBoard(document)))
    }

    /// Applies the operation a ticket was issued for.
    ///
    /// State may have moved on since the ticket was issued, so targets are
    /// looked up again; a vanished target yields `Skipped`.
    pub fn confirm(&mut self, ticket: ConfirmationTicket) -> Outcome {
        info!(
            "event=confirm module=engine status=ok ticket_id={}",
            ticket.id()
        );
        match ticket.action {
            PendingAction::DeleteList(list_id) => self.apply_delete_list(list_id),
            PendingAction::ReplaceBoard(document) => self.apply_import(document),
        }
    }

    /// Abandons a ticket. Nothing changes and no notice is raised.
    pub fn decline(&mut self, ticket: ConfirmationTicket) {
        info!(
            "event=decline module=engine status=ok ticket_id={}",
            ticket.id()
        );
    }

    /// Queues an editor draft; only the last draft in the window commits.
    pub fn schedule_autosave(&mut self, draft: TaskDraft, now: Instant) {
        let task_id = draft.task_id;
        let superseded = self.autosave.schedule(draft, now);
        debug!(
            "event=autosave_schedule module=engine status=ok task_id={} superseded={}",
            task_id, superseded
        );
    }

    /// Drops the pending draft, e.g. when the editor closes.
    pub fn cancel_autosave(&mut self) -> bool {
        self.autosave.cancel().is_some()
    }

    pub fn autosave_due_at(&self) -> Option<Instant> {
        self.autosave.due_at()
    }

    /// Commits the pending draft once its delay has elapsed.
    pub fn poll_autosave(&mut self, now: Instant) -> bool {
        match self.autosave.take_due(now) {
            Some(draft) => self.commit_draft(&draft),
            None => false,
        }
    }

    /// Writes a draft's title and description through `update_task`.
    /// A blank title keeps the current one.
    pub fn commit_draft(&mut self, draft: &TaskDraft) -> bool {
        self.update_task(
            draft.task_id,
            TaskPatch::DetailsChange {
                title: draft.title.clone(),
                description: draft.description.clone(),
            },
        )
    }

    fn apply_delete_list(&mut self, list_id: ListId) -> Outcome {
        let Some(list) = self.store.remove_list(list_id) else {
            debug!(
                "event=list_delete module=engine status=skip reason=not_found list_id={}",
                list_id
            );
            return Outcome::Skipped;
        };
        let tasks = self.store.remove_tasks_in(list_id);
        info!(
            "event=list_delete module=engine status=ok list_id={} tasks={}",
            list_id,
            tasks.len()
        );

        self.commit(
            Action::DeleteList { list, tasks },
            Some(self.success("List deleted", "List and all its tasks have been deleted.")),
        );
        Outcome::Applied
    }

    fn apply_import(&mut self, document: ImportDocument) -> Outcome {
        self.store = document.into_store();
        self.history.clear();
        self.autosave.cancel();
        info!(
            "event=board_import module=engine status=ok lists={} tasks={} next_id={}",
            self.store.lists().len(),
            self.store.tasks().len(),
            self.store.next_id()
        );

        self.finish(Some(self.success(
            "Board imported",
            "Your board has been successfully imported.",
        )));
        Outcome::Applied
    }

    fn issue_ticket(&mut self, prompt: ConfirmationPrompt, action: PendingAction) -> ConfirmationTicket {
        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        ConfirmationTicket::new(id, prompt, action)
    }

    fn commit(&mut self, action: Action, notice: Option<Notice>) {
        self.history.push(ActionRecord::new(action, self.clock.now()));
        self.finish(notice);
    }

    fn finish(&mut self, notice: Option<Notice>) {
        self.persist();
        self.refresh();
        if let Some(notice) = notice {
            self.view.notify(&notice);
        }
    }

    fn persist(&self) {
        if let Err(err) = self.gateway.save(&self.store, &self.history) {
            error!(
                "event=board_save module=engine status=error slot={} error={}",
                self.gateway.slot_key(),
                err
            );
        }
    }

    fn refresh(&mut self) {
        self.view.refresh(&self.store, self.history.len());
    }

    fn success(&self, title: &str, description: &str) -> Notice {
        Notice::success(title, description, self.config.notice_ttl())
    }

    fn failure(&self, title: &str, description: &str) -> Notice {
        Notice::error(title, description, self.config.notice_ttl())
    }

    fn refuse_exhausted(&mut self, event: &str) {
        warn!(
            "event={} module=engine status=error reason=ids_exhausted next_id={}",
            event,
            self.store.next_id()
        );
        let notice = self.failure("Board is full", "No more ids are available on this board.");
        self.view.notify(&notice);
    }
}
