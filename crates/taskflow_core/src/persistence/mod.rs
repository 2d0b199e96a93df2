//! Persistence Gateway: durable slot snapshots, seed fallback, and
//! portable export/import documents.

pub mod document;
pub mod gateway;
pub mod schema;
pub mod seed;

pub use document::{
    parse_import, ExportDocument, ExportedFile, ImportDocument, ImportError,
    EXPORT_FORMAT_VERSION,
};
pub use gateway::{LoadOrigin, LoadedBoard, PersistenceError, PersistenceGateway};
pub use schema::{
    decode_snapshot, encode_snapshot, IntegrityError, PersistedBoard, SnapshotError,
    SCHEMA_VERSION,
};
pub use seed::{seed_board, SEED_NEXT_ID};
