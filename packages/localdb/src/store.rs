//! The store itself: named tables plus meta flags, write-through persisted.

use crate::backend::{EphemeralBackend, StorageBackend};
use crate::dump::{Dump, Record};
use serde_json::Value;
use tracing::{debug, error};

/// In-process document store: named tables of JSON records plus a global
/// meta key/value namespace.
///
/// One instance per process, constructed by the entry point and passed by
/// reference to whoever needs it. Single writer, synchronous, no internal
/// locking; operations are totally ordered by invocation order. Cross-process
/// sharing of the same durable blob is last-writer-wins and not coordinated.
pub struct LocalDb {
    dump: Dump,
    backend: Box<dyn StorageBackend>,
}

impl LocalDb {
    /// Open a store on the given backend, hydrating from the last persisted
    /// dump if one exists, otherwise starting empty.
    pub fn open(backend: Box<dyn StorageBackend>) -> Self {
        let dump = backend.load().unwrap_or_default();
        Self { dump, backend }
    }

    /// Store with no durable medium; starts empty every run.
    pub fn ephemeral() -> Self {
        Self::open(Box::new(EphemeralBackend))
    }

    /// Current value of a meta key, if ever set. No side effects.
    pub fn get_meta(&self, key: &str) -> Option<&Value> {
        self.dump.meta.get(key)
    }

    /// Create or overwrite a meta entry, then write the store through.
    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) {
        self.dump.meta.insert(key.into(), value);
        self.persist();
    }

    /// Records of a table; an absent table reads as empty.
    pub fn table(&self, name: &str) -> &[Record] {
        self.dump.table(name)
    }

    /// Replace the full contents of a table, then write the store through.
    /// This is the only table write; there is no insert/update/delete by id
    /// at this layer.
    pub fn replace_table(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.dump.tables.insert(name.into(), records);
        self.persist();
    }

    /// Read-only snapshot of the whole store.
    pub fn dump(&self) -> &Dump {
        &self.dump
    }

    // In-memory state stays authoritative whether or not the write lands;
    // a failed save only costs durability across a restart.
    fn persist(&self) {
        if let Err(e) = self.backend.save(&self.dump) {
            error!("Persisting store failed: {}", e);
        } else {
            debug!("Persisted store");
        }
    }
}
