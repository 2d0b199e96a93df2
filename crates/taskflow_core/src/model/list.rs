//! Board list (column) model.

use super::ids::ListId;
use serde::{Deserialize, Serialize};

/// A named column holding an ordered set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    pub id: ListId,
    pub title: String,
    /// Sort rank among sibling lists. Not necessarily contiguous.
    pub position: i64,
}

impl BoardList {
    pub fn new(id: ListId, title: impl Into<String>, position: i64) -> Self {
        Self {
            id,
            title: title.into(),
            position,
        }
    }
}
