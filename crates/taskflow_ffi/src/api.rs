//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board use-cases to Dart via FRB as flat, sync functions.
//! - Own the single process-wide board session between `board_open` and
//!   `board_close`.
//! - Hold at most one pending confirmation ticket for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation goes through `BoardService`; Dart never writes state.
//! - A new destructive request replaces (declines) the previous pending one.

use log::{info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Instant;
use taskflow_core::db::open_db;
use taskflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardService, BoardStore, BoardView, ConfirmationTicket, EngineConfig, ListId, Notice,
    Outcome, Severity, SqliteSlotRepository, TaskDraft, TaskId, TaskPatch,
};

const BOARD_DB_FILE_NAME: &str = "taskflow.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

/// View that buffers notices until Dart drains them.
#[derive(Debug, Default)]
struct BufferedView {
    notices: Vec<Notice>,
    revision: u64,
}

impl BoardView for BufferedView {
    fn refresh(&mut self, _board: &BoardStore, _history_len: usize) {
        self.revision += 1;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

struct Session {
    service: BoardService<SqliteSlotRepository, BufferedView>,
    pending: Option<ConfirmationTicket>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope for board commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the request was accepted.
    pub ok: bool,
    /// Whether state actually changed.
    pub changed: bool,
    /// Created list/task id, when any.
    pub entity_id: Option<i64>,
    /// A confirmation is pending; call `confirm_pending` or `decline_pending`.
    pub needs_confirmation: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: true,
            entity_id: None,
            needs_confirmation: false,
            message: message.into(),
        }
    }

    fn created(message: impl Into<String>, entity_id: u64) -> Self {
        Self {
            entity_id: Some(wire_id(entity_id)),
            ..Self::changed(message)
        }
    }

    fn unchanged() -> Self {
        Self {
            changed: false,
            ..Self::changed("No change.")
        }
    }

    fn confirmation(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            needs_confirmation: true,
            ..Self::changed(message)
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            entity_id: None,
            needs_confirmation: false,
            message: message.into(),
        }
    }

    fn from_bool(changed: bool, message: &str) -> Self {
        if changed {
            Self::changed(message)
        } else {
            Self::unchanged()
        }
    }
}

/// Task row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub done: bool,
    pub position: i64,
    pub created_at_epoch_ms: i64,
}

/// List column with its tasks in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: i64,
    pub title: String,
    pub position: i64,
    pub tasks: Vec<TaskItem>,
}

/// Full render model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub lists: Vec<ListItem>,
    pub can_undo: bool,
    /// Bumped on every engine refresh; lets Dart skip redundant rebuilds.
    pub revision: u64,
}

/// Toast payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeItem {
    pub title: String,
    pub description: String,
    /// `success|error`.
    pub severity: String,
    pub ttl_ms: u64,
}

/// Export payload for a save-file dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardExportResponse {
    pub ok: bool,
    pub file_name: String,
    pub contents: String,
    pub message: String,
}

/// Opens the board session, closing any previous one first.
///
/// `db_path` overrides `TASKFLOW_DB_PATH` and the temp-dir default.
#[flutter_rust_bridge::frb(sync)]
pub fn board_open(db_path: Option<String>) -> BoardActionResponse {
    let path = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(resolve_board_db_path);

    let conn = match open_db(&path) {
        Ok(conn) => conn,
        Err(err) => return BoardActionResponse::failure(format!("board DB open failed: {err}")),
    };
    let repo = match SqliteSlotRepository::try_new(conn) {
        Ok(repo) => repo,
        Err(err) => return BoardActionResponse::failure(format!("board repo init failed: {err}")),
    };

    let mut slot = lock_session();
    if let Some(previous) = slot.take() {
        drop(previous.service.close());
    }
    let service = BoardService::open(repo, BufferedView::default(), EngineConfig::default());
    info!(
        "event=ffi_board_open module=ffi status=ok db_path={}",
        path.display()
    );
    *slot = Some(Session {
        service,
        pending: None,
    });
    BoardActionResponse::changed("Board opened.")
}

/// Saves and closes the session. Pending drafts and tickets are dropped.
#[flutter_rust_bridge::frb(sync)]
pub fn board_close() -> BoardActionResponse {
    match lock_session().take() {
        Some(session) => {
            drop(session.service.close());
            BoardActionResponse::changed("Board closed.")
        }
        None => BoardActionResponse::unchanged(),
    }
}

/// Current board in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> Option<BoardSnapshot> {
    let slot = lock_session();
    let session = slot.as_ref()?;
    let store = session.service.store();
    let lists = store
        .sorted_lists()
        .into_iter()
        .map(|list| ListItem {
            id: wire_id(list.id.get()),
            title: list.title.clone(),
            position: list.position,
            tasks: store
                .tasks_in_list(list.id)
                .into_iter()
                .map(|task| TaskItem {
                    id: wire_id(task.id.get()),
                    title: task.title.clone(),
                    description: task.description.clone(),
                    done: task.done,
                    position: task.position,
                    created_at_epoch_ms: task.created_at.timestamp_millis(),
                })
                .collect(),
        })
        .collect();

    Some(BoardSnapshot {
        lists,
        can_undo: session.service.can_undo(),
        revision: session.service.view().revision,
    })
}

/// Drains notices raised since the last call.
#[flutter_rust_bridge::frb(sync)]
pub fn take_notices() -> Vec<NoticeItem> {
    let mut slot = lock_session();
    let Some(session) = slot.as_mut() else {
        return Vec::new();
    };
    std::mem::take(&mut session.service.view_mut().notices)
        .into_iter()
        .map(|notice| NoticeItem {
            severity: match notice.severity {
                Severity::Success => "success",
                Severity::Error => "error",
            }
            .to_string(),
            ttl_ms: notice.ttl.as_millis() as u64,
            title: notice.title,
            description: notice.description,
        })
        .collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_create(title: String) -> BoardActionResponse {
    with_session(|session| match session.service.create_list(&title) {
        Some(id) => BoardActionResponse::created("List created.", id.get()),
        None => BoardActionResponse::unchanged(),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_rename(list_id: i64, title: String) -> BoardActionResponse {
    with_session(|session| {
        let changed = session.service.update_list_title(list_id_from(list_id), &title);
        BoardActionResponse::from_bool(changed, "List updated.")
    })
}

/// Deletes a list; non-empty lists leave a pending confirmation.
#[flutter_rust_bridge::frb(sync)]
pub fn list_delete(list_id: i64) -> BoardActionResponse {
    with_session(|session| {
        let outcome = session.service.delete_list(list_id_from(list_id));
        session.resolve(outcome, "List deleted.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_create(list_id: i64, title: String) -> BoardActionResponse {
    with_session(
        |session| match session.service.create_task(&title, list_id_from(list_id)) {
            Some(id) => BoardActionResponse::created("Task created.", id.get()),
            None => BoardActionResponse::unchanged(),
        },
    )
}

/// Immediate title/description commit (e.g. on editor close).
#[flutter_rust_bridge::frb(sync)]
pub fn task_update_details(task_id: i64, title: String, description: String) -> BoardActionResponse {
    with_session(|session| {
        let changed = session.service.update_task(
            task_id_from(task_id),
            TaskPatch::DetailsChange { title, description },
        );
        BoardActionResponse::from_bool(changed, "Task updated.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_set_done(task_id: i64, done: bool) -> BoardActionResponse {
    with_session(|session| {
        let changed = session
            .service
            .update_task(task_id_from(task_id), TaskPatch::SetDone { done });
        BoardActionResponse::from_bool(changed, "Task updated.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_move(task_id: i64, list_id: i64) -> BoardActionResponse {
    with_session(|session| {
        let changed = session
            .service
            .move_task(task_id_from(task_id), list_id_from(list_id));
        BoardActionResponse::from_bool(changed, "Task moved.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: i64) -> BoardActionResponse {
    with_session(|session| {
        let changed = session.service.delete_task(task_id_from(task_id));
        BoardActionResponse::from_bool(changed, "Task deleted.")
    })
}

/// Records editor keystrokes; the last draft commits after the debounce.
#[flutter_rust_bridge::frb(sync)]
pub fn task_draft_changed(task_id: i64, title: String, description: String) -> BoardActionResponse {
    with_session(|session| {
        session.service.schedule_autosave(
            TaskDraft {
                task_id: task_id_from(task_id),
                title,
                description,
            },
            Instant::now(),
        );
        BoardActionResponse::unchanged()
    })
}

/// Drops the pending draft when the editor closes without saving.
#[flutter_rust_bridge::frb(sync)]
pub fn task_draft_discard() -> BoardActionResponse {
    with_session(|session| {
        BoardActionResponse::from_bool(session.service.cancel_autosave(), "Draft discarded.")
    })
}

/// Commits the pending draft if its debounce has elapsed. Call from a UI timer.
#[flutter_rust_bridge::frb(sync)]
pub fn autosave_tick() -> BoardActionResponse {
    with_session(|session| {
        let changed = session.service.poll_autosave(Instant::now());
        BoardActionResponse::from_bool(changed, "Task updated.")
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_undo() -> BoardActionResponse {
    with_session(|session| match session.service.undo_last_action() {
        Ok(Some(kind)) => BoardActionResponse::changed(format!("Undid {kind}.")),
        Ok(None) => BoardActionResponse::unchanged(),
        Err(err) => BoardActionResponse::failure(format!("board_undo failed: {err}")),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_export() -> BoardExportResponse {
    let failure = |message: String| BoardExportResponse {
        ok: false,
        file_name: String::new(),
        contents: String::new(),
        message,
    };

    let mut slot = lock_session();
    let Some(session) = slot.as_mut() else {
        return failure("board is not open".to_string());
    };
    match session.service.export_board() {
        Ok(file) => BoardExportResponse {
            ok: true,
            file_name: file.file_name,
            contents: file.contents,
            message: "Board exported.".to_string(),
        },
        Err(err) => failure(format!("board_export failed: {err}")),
    }
}

/// Validates `contents` and leaves a pending replace confirmation.
#[flutter_rust_bridge::frb(sync)]
pub fn board_import(contents: String) -> BoardActionResponse {
    with_session(|session| match session.service.import_board(&contents) {
        Ok(ticket) => session.resolve(Outcome::NeedsConfirmation(ticket), "Board imported."),
        Err(err) => BoardActionResponse::failure(format!("board_import failed: {err}")),
    })
}

/// Applies the pending destructive operation.
#[flutter_rust_bridge::frb(sync)]
pub fn confirm_pending() -> BoardActionResponse {
    with_session(|session| match session.pending.take() {
        Some(ticket) => {
            let changed = session.service.confirm(ticket).is_applied();
            BoardActionResponse::from_bool(changed, "Confirmed.")
        }
        None => BoardActionResponse::failure("nothing to confirm"),
    })
}

/// Abandons the pending destructive operation.
#[flutter_rust_bridge::frb(sync)]
pub fn decline_pending() -> BoardActionResponse {
    with_session(|session| match session.pending.take() {
        Some(ticket) => {
            session.service.decline(ticket);
            BoardActionResponse::unchanged()
        }
        None => BoardActionResponse::failure("nothing to decline"),
    })
}

impl Session {
    fn resolve(&mut self, outcome: Outcome, applied_message: &str) -> BoardActionResponse {
        match outcome {
            Outcome::Applied => BoardActionResponse::changed(applied_message),
            Outcome::Skipped => BoardActionResponse::unchanged(),
            Outcome::NeedsConfirmation(ticket) => {
                let message = ticket.prompt().message();
                if let Some(previous) = self.pending.replace(ticket) {
                    self.service.decline(previous);
                }
                BoardActionResponse::confirmation(message)
            }
        }
    }
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    let mutex = SESSION.get_or_init(|| Mutex::new(None));
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("event=ffi_session_lock module=ffi status=recovered reason=poisoned");
            poisoned.into_inner()
        }
    }
}

fn with_session(f: impl FnOnce(&mut Session) -> BoardActionResponse) -> BoardActionResponse {
    let mut slot = lock_session();
    match slot.as_mut() {
        Some(session) => f(session),
        None => BoardActionResponse::failure("board is not open"),
    }
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TASKFLOW_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

// Stored ids never exceed `MAX_ID`, so the fallback is unreachable and
// would not match any entity if fed back.
fn wire_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

// Negative ids from Dart can never match a stored id.
fn list_id_from(raw: i64) -> ListId {
    ListId(u64::try_from(raw).unwrap_or(0))
}

fn task_id_from(raw: i64) -> TaskId {
    TaskId(u64::try_from(raw).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::{
        board_close, board_export, board_import, board_open, board_snapshot, board_undo,
        confirm_pending, core_version, decline_pending, init_logging, list_create, list_delete,
        list_rename, ping, take_notices, task_create, task_move, task_set_done, wire_id,
    };
    use std::sync::{Mutex, MutexGuard};
    use taskflow_core::MAX_ID;

    // The session is process-wide; board tests must not interleave.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn open_fresh(dir: &tempfile::TempDir) {
        let path = dir.path().join("board.sqlite3");
        let response = board_open(Some(path.to_string_lossy().into_owned()));
        assert!(response.ok, "{}", response.message);
        take_notices();
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn commands_fail_cleanly_without_session() {
        let _guard = serial();
        board_close();

        let response = list_create("Nope".to_string());
        assert!(!response.ok);
        assert!(board_snapshot().is_none());
        assert!(take_notices().is_empty());
    }

    #[test]
    fn create_move_and_undo_round_trip() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);

        let created = task_create(2, "Ship it".to_string());
        assert!(created.ok, "{}", created.message);
        assert_eq!(created.entity_id, Some(5));

        assert!(task_move(5, 3).changed);
        assert!(task_set_done(5, true).changed);
        let snapshot = board_snapshot().unwrap();
        let done_list = &snapshot.lists[2];
        assert_eq!(done_list.tasks.last().unwrap().id, 5);
        assert!(done_list.tasks.last().unwrap().done);
        assert!(snapshot.can_undo);

        assert!(board_undo().changed);
        assert!(board_undo().changed);
        let snapshot = board_snapshot().unwrap();
        assert!(snapshot.lists[1].tasks.iter().any(|task| task.id == 5));

        let notices = take_notices();
        assert_eq!(notices.first().unwrap().title, "Task created");
        assert!(notices.iter().all(|notice| notice.severity == "success"));
        board_close();
    }

    #[test]
    fn list_delete_waits_for_confirmation() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);

        let pending = list_delete(1);
        assert!(pending.needs_confirmation);
        assert!(pending.message.contains("To Do"));
        assert!(decline_pending().ok);
        assert_eq!(board_snapshot().unwrap().lists.len(), 3);

        list_delete(1);
        assert!(confirm_pending().changed);
        assert_eq!(board_snapshot().unwrap().lists.len(), 2);
        assert!(!confirm_pending().ok);
        board_close();
    }

    #[test]
    fn export_then_import_replaces_board() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);

        let exported = board_export();
        assert!(exported.ok, "{}", exported.message);
        assert!(exported.file_name.starts_with("taskflow-board-"));

        list_create("Temporary".to_string());
        let pending = board_import(exported.contents);
        assert!(pending.needs_confirmation);
        assert!(confirm_pending().changed);

        let snapshot = board_snapshot().unwrap();
        assert_eq!(snapshot.lists.len(), 3);
        assert!(!snapshot.can_undo);

        let rejected = board_import("{}".to_string());
        assert!(!rejected.ok);
        let notices = take_notices();
        assert_eq!(notices.last().unwrap().severity, "error");
        board_close();
    }

    #[test]
    fn reopening_restores_saved_board() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);
        let created = list_create("Persisted".to_string());
        board_close();

        open_fresh(&dir);
        let snapshot = board_snapshot().unwrap();
        assert!(snapshot
            .lists
            .iter()
            .any(|list| Some(list.id) == created.entity_id && list.title == "Persisted"));
        board_close();
    }

    #[test]
    fn largest_imported_ids_round_trip_through_the_wire() {
        let _guard = serial();
        let dir = tempfile::tempdir().unwrap();
        open_fresh(&dir);

        let list_id = MAX_ID - 1;
        let contents = format!(
            r#"{{"lists":[{{"id":{list_id},"title":"Edge","position":0}}],
                "tasks":[{{"id":{MAX_ID},"title":"Last","description":"","done":false,
                "position":0,"listId":{list_id},"createdAt":"2024-01-01T00:00:00Z"}}]}}"#
        );
        assert!(board_import(contents).needs_confirmation);
        assert!(confirm_pending().changed);

        let snapshot = board_snapshot().unwrap();
        let wire_list = snapshot.lists[0].id;
        let wire_task = snapshot.lists[0].tasks[0].id;
        assert_eq!(u64::try_from(wire_list).unwrap(), list_id);
        assert_eq!(u64::try_from(wire_task).unwrap(), MAX_ID);

        assert!(list_rename(wire_list, "Renamed".to_string()).changed);
        assert!(task_set_done(wire_task, true).changed);

        let full = list_create("Overflow".to_string());
        assert!(full.ok);
        assert!(!full.changed);
        assert_eq!(full.entity_id, None);
        assert_eq!(take_notices().last().unwrap().title, "Board is full");

        let rejected = board_import(
            r#"{"lists":[{"id":18446744073709551615,"title":"Big","position":0}],"tasks":[]}"#
                .to_string(),
        );
        assert!(!rejected.ok);
        assert_eq!(board_snapshot().unwrap().lists[0].title, "Renamed");
        board_close();
    }

    #[test]
    fn wire_ids_never_turn_negative() {
        assert_eq!(wire_id(MAX_ID), 9_007_199_254_740_991);
        assert_eq!(wire_id(u64::MAX), i64::MAX);
    }
}
