//! Snapshot model: the complete serializable state of one store.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single record. Open schema; by convention every record carries an
/// `id` string (unique within its table) and a `created_date` ISO-8601
/// string. Individual tables add their own domain fields on top.
pub type Record = Value;

/// Everything a store holds at one instant: all tables plus the meta
/// namespace. There is no hidden state elsewhere; a `Dump` is sufficient
/// to reconstruct the store.
///
/// Serializes to the persisted blob format:
/// `{ "tables": { "<name>": [record, ...] }, "meta": { "<key>": value } }`
///
/// Tables keep record order; the maps keep insertion order, so a
/// dump/restore cycle preserves both.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Dump {
    #[serde(default)]
    pub tables: IndexMap<String, Vec<Record>>,
    #[serde(default)]
    pub meta: IndexMap<String, Value>,
}

impl Dump {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of a table; an absent table reads as empty.
    pub fn table(&self, name: &str) -> &[Record] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
