//! Monotonic integer id allocator shared by lists and tasks.

use crate::model::MAX_ID;

/// Hands out strictly increasing ids starting at 1.
///
/// # Invariants
/// - `allocate()` never returns the same value twice for one allocator.
/// - `allocate()` never returns a value above `MAX_ID`; once the range is
///   used up it returns `None` and the counter stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Resumes allocation at `next` (values below 1 are raised to 1).
    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    /// Returns the next id and advances the counter, or `None` when exhausted.
    pub fn allocate(&mut self) -> Option<u64> {
        if self.next > MAX_ID {
            return None;
        }
        let id = self.next;
        self.next = id.checked_add(1)?;
        Some(id)
    }

    /// Value the next `allocate` call will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
