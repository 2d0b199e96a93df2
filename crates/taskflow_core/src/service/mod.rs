//! Mutation engine services.
//!
//! # Responsibility
//! - Route every board change through `BoardService`.
//! - Keep CLI/FFI layers decoupled from storage and history details.

pub mod autosave;
pub mod board_service;
pub mod confirmation;

pub use autosave::{AutosaveScheduler, TaskDraft};
pub use board_service::BoardService;
pub use confirmation::{ConfirmationPrompt, ConfirmationTicket, Outcome};
