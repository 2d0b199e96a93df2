//! Two-phase confirmation for destructive operations.
//!
//! A destructive request returns a `ConfirmationTicket` instead of blocking
//! on a prompt. The caller shows `prompt()` however it likes, then hands the
//! ticket back to `BoardService::confirm` or `BoardService::decline`.
//! Tickets are move-only, so each one is resolved at most once; dropping a
//! ticket is the same as declining it.

use crate::model::ListId;
use crate::persistence::ImportDocument;

/// What the user is being asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationPrompt {
    DeleteList {
        list_id: ListId,
        title: String,
        task_count: usize,
    },
    ReplaceBoard {
        list_count: usize,
        task_count: usize,
    },
}

impl ConfirmationPrompt {
    /// Human-readable question for simple views.
    pub fn message(&self) -> String {
        match self {
            Self::DeleteList { title, .. } => format!("Delete \"{title}\" and all its tasks?"),
            Self::ReplaceBoard { .. } => {
                "This will replace your current board. Are you sure?".to_string()
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum PendingAction {
    DeleteList(ListId),
    ReplaceBoard(ImportDocument),
}

/// Pending destructive operation awaiting a decision.
#[derive(Debug)]
#[must_use = "a ticket does nothing until passed to confirm() or decline()"]
pub struct ConfirmationTicket {
    id: u64,
    prompt: ConfirmationPrompt,
    pub(crate) action: PendingAction,
}

impl ConfirmationTicket {
    pub(crate) fn new(id: u64, prompt: ConfirmationPrompt, action: PendingAction) -> Self {
        Self { id, prompt, action }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn prompt(&self) -> &ConfirmationPrompt {
        &self.prompt
    }
}

/// Result of an operation that may need confirmation.
#[derive(Debug)]
pub enum Outcome {
    /// State changed.
    Applied,
    /// Validation no-op; nothing changed.
    Skipped,
    /// Nothing changed yet; resolve the ticket to continue.
    NeedsConfirmation(ConfirmationTicket),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Extracts the ticket, if confirmation is required.
    pub fn into_ticket(self) -> Option<ConfirmationTicket> {
        match self {
            Self::NeedsConfirmation(ticket) => Some(ticket),
            _ => None,
        }
    }
}
