//! Document Store: the flat JSON file holding every curriculum record.
//!
//! Every mutation rewrites the whole collection. There is no cross-process
//! locking: two writers racing on the same file resolve as last write wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::curriculum::CurriculumRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full ordered collection.
    ///
    /// A missing file is an empty store. A file that exists but does not parse
    /// as an array of records is `StoreError::Corrupt`; nothing is recovered.
    pub fn load(&self) -> Result<Vec<CurriculumRecord>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No store file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let records: Vec<CurriculumRecord> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(count = records.len(), "Loaded curriculum records");
        Ok(records)
    }

    /// Overwrites the store with `records`.
    ///
    /// The payload goes to a temp file in the same directory which is then
    /// renamed over the target, so readers in this process never observe a
    /// half-written file. No fsync is issued.
    pub fn save(&self, records: &[CurriculumRecord]) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(records).map_err(StoreError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&payload).map_err(io_err)?;
        // The temp file is created 0600; keep the existing file's mode.
        if let Ok(existing) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_err)?;
        }
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        info!(count = records.len(), path = %self.path.display(), "Saved curriculum records");
        Ok(())
    }
}

/// Next record id: one past the highest existing id (1 for an empty store).
pub fn next_record_id(records: &[CurriculumRecord]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

pub fn find_record(records: &[CurriculumRecord], id: u64) -> Option<&CurriculumRecord> {
    records.iter().find(|r| r.id == id)
}

pub fn find_record_mut(records: &mut [CurriculumRecord], id: u64) -> Option<&mut CurriculumRecord> {
    records.iter_mut().find(|r| r.id == id)
}
