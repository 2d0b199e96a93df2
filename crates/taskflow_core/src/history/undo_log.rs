//! Bounded stack of action records.
//!
//! # Invariants
//! - Never holds more than `capacity` records; the oldest are dropped first.
//! - `pop` consumes the record whether or not its inversion later succeeds.

use super::action::ActionRecord;
use std::collections::VecDeque;

/// Default number of records kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Undo log with front truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoLog {
    records: VecDeque<ActionRecord>,
    capacity: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LIMIT)
    }
}

impl UndoLog {
    /// Creates an empty log. A zero capacity is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds a log from persisted records, oldest first, keeping only
    /// the newest `capacity` entries.
    pub fn from_records(records: Vec<ActionRecord>, capacity: usize) -> Self {
        let mut log = Self::with_capacity(capacity);
        for record in records {
            log.push(record);
        }
        log
    }

    pub fn push(&mut self, record: ActionRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Removes and returns the most recent record.
    pub fn pop(&mut self) -> Option<ActionRecord> {
        self.records.pop_back()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActionRecord> {
        self.records.iter()
    }

    /// Owned copy, oldest first, for persistence.
    pub fn to_records(&self) -> Vec<ActionRecord> {
        self.records.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::UndoLog;
    use crate::history::action::{Action, ActionRecord};
    use crate::model::{BoardList, ListId};
    use chrono::{TimeZone, Utc};

    fn record(id: u64) -> ActionRecord {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ActionRecord::new(
            Action::AddList {
                list: BoardList::new(ListId(id), "L", 0),
            },
            now,
        )
    }

    #[test]
    fn push_truncates_oldest_first() {
        let mut log = UndoLog::with_capacity(3);
        for id in 1..=5 {
            log.push(record(id));
        }

        assert_eq!(log.len(), 3);
        let kept = log
            .iter()
            .map(|record| match &record.action {
                Action::AddList { list } => list.id.get(),
                _ => 0,
            })
            .collect::<Vec<_>>();
        assert_eq!(kept, vec![3, 4, 5]);
    }

    #[test]
    fn pop_returns_most_recent() {
        let mut log = UndoLog::default();
        log.push(record(1));
        log.push(record(2));

        let popped = log.pop().unwrap();
        assert!(matches!(popped.action, Action::AddList { ref list } if list.id == ListId(2)));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn from_records_respects_capacity() {
        let records = (1..=4).map(record).collect::<Vec<_>>();
        let log = UndoLog::from_records(records, 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.capacity(), 2);
    }
}
