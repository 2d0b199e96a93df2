//! Debounced commit of in-progress task edits.
//!
//! # Invariants
//! - At most one draft is pending; scheduling replaces it and restarts the
//!   delay, so only the last edit inside the window is committed.
//! - `cancel` drops the pending draft without committing it.
//!
//! The scheduler does not own a timer. Callers pass `Instant`s in, which
//! keeps it usable from any event loop and deterministic under test.

use crate::model::TaskId;
use std::time::{Duration, Instant};

/// Latest text typed into a task editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub task_id: TaskId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
struct PendingDraft {
    draft: TaskDraft,
    due_at: Instant,
}

/// Single-slot debounce timer for `TaskDraft`s.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay: Duration,
    pending: Option<PendingDraft>,
}

impl AutosaveScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending draft and restarts the delay from `now`.
    /// Returns whether an earlier draft was superseded.
    pub fn schedule(&mut self, draft: TaskDraft, now: Instant) -> bool {
        let superseded = self.pending.is_some();
        self.pending = Some(PendingDraft {
            draft,
            due_at: now + self.delay,
        });
        superseded
    }

    /// Drops the pending draft, returning it.
    pub fn cancel(&mut self) -> Option<TaskDraft> {
        self.pending.take().map(|pending| pending.draft)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Yields the draft once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<TaskDraft> {
        match &self.pending {
            Some(pending) if now >= pending.due_at => self.cancel(),
            _ => None,
        }
    }
}
