//! Board domain model.
//!
//! # Responsibility
//! - Define lists, tasks and their identifiers.
//! - Define typed task patches used by the mutation engine.
//!
//! # Invariants
//! - Ids are unique within their collection and never reused.
//! - Task `list_id` must reference a live list.

pub mod ids;
pub mod list;
pub mod patch;
pub mod task;

pub use ids::{ListId, TaskId, MAX_ID};
pub use list::BoardList;
pub use patch::{normalize_title, TaskPatch};
pub use task::Task;
