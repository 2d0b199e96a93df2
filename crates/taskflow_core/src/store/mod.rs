//! Board Store: canonical lists/tasks plus the identifier allocator.

mod board_store;
mod id_allocator;

pub use board_store::BoardStore;
pub use id_allocator::IdAllocator;
