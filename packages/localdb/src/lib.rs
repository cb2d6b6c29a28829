// src/lib.rs

pub mod backend;
pub mod dump;
pub mod seed;
pub mod store;

// Re-export commonly used types for convenience
pub use backend::{EphemeralBackend, FileBackend, StorageBackend, STORAGE_KEY};
pub use dump::{Dump, Record};
pub use seed::{ensure_seeded, ensure_seeded_at, SEEDED_FLAG};
pub use store::LocalDb;
