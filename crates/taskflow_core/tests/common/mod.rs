#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use taskflow_core::{
    BoardService, BoardStore, BoardView, EngineConfig, FixedClock, InMemorySlotRepository, Notice,
    Severity,
};

/// View that remembers what the engine told it.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub refreshes: usize,
    pub last_history_len: usize,
    pub notices: Vec<Notice>,
}

impl RecordingView {
    pub fn titles(&self) -> Vec<&str> {
        self.notices.iter().map(|notice| notice.title.as_str()).collect()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn error_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.severity == Severity::Error)
            .count()
    }
}

impl BoardView for RecordingView {
    fn refresh(&mut self, _board: &BoardStore, history_len: usize) {
        self.refreshes += 1;
        self.last_history_len = history_len;
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

pub type TestService = BoardService<InMemorySlotRepository, RecordingView>;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
}

/// Seeded board over an empty in-memory slot, pinned to `fixed_now()`.
pub fn open_seeded() -> (TestService, FixedClock) {
    open_with_repo(InMemorySlotRepository::new(), EngineConfig::default())
}

pub fn open_with_repo(
    repo: InMemorySlotRepository,
    config: EngineConfig,
) -> (TestService, FixedClock) {
    let clock = FixedClock::new(fixed_now());
    let service = BoardService::open_with_clock(
        repo,
        RecordingView::default(),
        config,
        Box::new(clock.clone()),
    );
    (service, clock)
}

/// `(id, title, list_id, position, done)` for every task, sorted by id.
pub fn task_rows(store: &BoardStore) -> Vec<(u64, String, u64, i64, bool)> {
    let mut rows = store
        .tasks()
        .iter()
        .map(|task| {
            (
                task.id.get(),
                task.title.clone(),
                task.list_id.get(),
                task.position,
                task.done,
            )
        })
        .collect::<Vec<_>>();
    rows.sort();
    rows
}

/// `(id, title, position)` for every list, sorted by id.
pub fn list_rows(store: &BoardStore) -> Vec<(u64, String, i64)> {
    let mut rows = store
        .lists()
        .iter()
        .map(|list| (list.id.get(), list.title.clone(), list.position))
        .collect::<Vec<_>>();
    rows.sort();
    rows
}
