//! View seam: what the engine tells whatever renders the board.
//!
//! # Responsibility
//! - Receive a full refresh after every applied mutation, undo and import.
//! - Receive transient user-facing notices.
//!
//! # Invariants
//! - Views only read the store; every write goes through `BoardService`.

use crate::store::BoardStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// Toast-style message with an auto-dismiss duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub ttl: Duration,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>, ttl: Duration) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Success,
            ttl,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>, ttl: Duration) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
            ttl,
        }
    }
}

/// Renderer driven by the mutation engine.
pub trait BoardView {
    /// Redraw from current state. `history_len` drives the undo affordance.
    fn refresh(&mut self, board: &BoardStore, history_len: usize);
    /// Show a transient notice.
    fn notify(&mut self, notice: &Notice);
}

/// Headless view that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl BoardView for NullView {
    fn refresh(&mut self, _board: &BoardStore, _history_len: usize) {}

    fn notify(&mut self, _notice: &Notice) {}
}

impl<V: BoardView + ?Sized> BoardView for &mut V {
    fn refresh(&mut self, board: &BoardStore, history_len: usize) {
        (**self).refresh(board, history_len);
    }

    fn notify(&mut self, notice: &Notice) {
        (**self).notify(notice);
    }
}
