//! Repository layer: durable key-value slot storage.
//!
//! # Responsibility
//! - Define the storage contract the persistence gateway writes through.
//! - Isolate SQLite query details from board orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport errors; they never interpret
//!   payload contents.

pub mod slot_repo;

pub use slot_repo::{
    InMemorySlotRepository, RepoError, RepoResult, SlotRepository, SqliteSlotRepository,
};
