//! Storage backends: where a store's dump lives between process runs.
//!
//! The backend is picked once, at store construction. A durable context
//! gets a [`FileBackend`]; a headless/build context gets an
//! [`EphemeralBackend`] and simply reseeds every run.

use crate::dump::Dump;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Fixed storage key. The durable blob lives in a file of this name unless
/// the caller picks an explicit path.
pub const STORAGE_KEY: &str = "icdi_local_db_v1";

/// Abstract interface for the persistence medium backing a store.
/// This decouples the store from the concrete medium, so the same store
/// code runs durable-backed or purely in memory.
pub trait StorageBackend {
    /// Read the persisted dump. Missing or corrupt data yields `None`;
    /// the store then starts empty rather than failing startup.
    fn load(&self) -> Option<Dump>;

    /// Write the full dump. Errors are returned so the store can log them;
    /// they never reach the store's caller.
    fn save(&self, dump: &Dump) -> Result<()>;
}

/// Durable backend: the whole dump as a single JSON blob at a fixed path.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Blob at the default file name under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> Option<Dump> {
        if !self.path.exists() {
            info!("No persisted store at {:?}, starting fresh", self.path);
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Dump>(&content) {
                Ok(dump) => {
                    info!("Loaded persisted store from {:?}", self.path);
                    Some(dump)
                }
                Err(e) => {
                    error!("Failed to parse persisted store, starting fresh: {}", e);
                    None
                }
            },
            Err(e) => {
                error!("Failed to read persisted store, starting fresh: {}", e);
                None
            }
        }
    }

    fn save(&self, dump: &Dump) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }
        let content = serde_json::to_string(dump).context("Failed to serialize store")?;
        fs::write(&self.path, content).context("Failed to write store file")?;
        Ok(())
    }
}

/// Backend for contexts without a durable medium. Loads nothing, saves
/// nowhere; the store works normally but nothing survives process end.
#[derive(Debug, Default, Clone, Copy)]
pub struct EphemeralBackend;

impl StorageBackend for EphemeralBackend {
    fn load(&self) -> Option<Dump> {
        None
    }

    fn save(&self, _dump: &Dump) -> Result<()> {
        Ok(())
    }
}
