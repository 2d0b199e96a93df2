//! Undo Log: action records, the bounded record stack and inversion.
//!
//! # Responsibility
//! - Capture enough data per mutation to reverse it.
//! - Replay inverses one record per undo call; there is no redo.
//!
//! # Invariants
//! - The log never exceeds its capacity (50 by default).
//! - A popped record is gone even when its inversion fails.

pub mod action;
pub mod invert;
pub mod undo_log;

pub use action::{Action, ActionKind, ActionRecord};
pub use invert::{invert, UndoError};
pub use undo_log::{UndoLog, DEFAULT_HISTORY_LIMIT};
