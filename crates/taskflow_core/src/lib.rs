//! Core domain logic for Taskflow boards.
//! This crate is the single source of truth for board invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod history;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig, LoggingConfig, TaskflowConfig};
pub use history::{Action, ActionKind, ActionRecord, UndoError, UndoLog};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::{BoardList, ListId, Task, TaskId, TaskPatch, MAX_ID};
pub use persistence::{ExportedFile, ImportError, LoadOrigin};
pub use repo::{
    InMemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
pub use service::{BoardService, ConfirmationPrompt, ConfirmationTicket, Outcome, TaskDraft};
pub use store::BoardStore;
pub use view::{BoardView, Notice, NullView, Severity};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
