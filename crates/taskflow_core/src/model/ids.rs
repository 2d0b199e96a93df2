//! Integer identifiers for board entities.
//!
//! # Responsibility
//! - Give lists and tasks distinct id types so they cannot be mixed up.
//! - Keep the wire form a bare integer (`1`, `2`, ...).
//!
//! # Invariants
//! - Both id kinds are drawn from one monotonic counter (see
//!   `store::IdAllocator`), so values are unique within each collection
//!   and never reused.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Largest id a board may hold (2^53 - 1).
///
/// Larger ids lose precision in JSON number consumers. Every id up to this
/// value, and the allocator's next value after it, fits the FFI's `i64`.
pub const MAX_ID: u64 = (1 << 53) - 1;

/// Identifier of one board list (column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

/// Identifier of one task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl ListId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ListId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ListId, TaskId, MAX_ID};

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&ListId(3)).unwrap(), "3");
        let task_id: TaskId = serde_json::from_str("42").unwrap();
        assert_eq!(task_id, TaskId(42));
    }

    #[test]
    fn max_id_fits_signed_wire_type() {
        assert!(i64::try_from(MAX_ID).is_ok());
        assert!(i64::try_from(MAX_ID + 1).is_ok());
    }
}
