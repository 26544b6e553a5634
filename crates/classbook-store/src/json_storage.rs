//! JSON file storage
//!
//! Implements the core `Persistence` seam over a single data file.
//!
//! ## Logging Ownership
//!
//! `load` and `write` own their lifecycle events (`load`/`save` ops). The
//! session logs the surrounding command separately.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use classbook_core::{log_op_end, log_op_error, log_op_start};
use classbook_core::{Persistence, PersistenceFailure, Store};

use crate::atomic::atomic_write;
use crate::errors::{io_error, serialization_error, to_persistence_failure, Result};
use crate::format::StoreDocument;

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the data file
    ///
    /// Returns `Ok(None)` when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// * `PermissionDenied`/`Io` - the file exists but cannot be read
    /// * `Serialization` - the file is not a valid document
    /// * `InvariantViolation` - the document breaks a store invariant
    pub fn load(&self) -> Result<Option<Store>> {
        log_op_start!("load", path = %self.path.display());
        let start = Instant::now();

        let result = self.load_impl().map_err(|e| {
            log_op_error!(
                "load",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "load",
            duration_ms = start.elapsed().as_millis() as u64,
            found = result.is_some()
        );
        Ok(result)
    }

    /// Serialize `store` and replace the data file atomically
    ///
    /// # Errors
    ///
    /// * `PermissionDenied` - the file or its directory is not writable
    /// * `Io` - any other write failure
    /// * `Serialization` - the store could not be encoded
    pub fn write(&self, store: &Store) -> Result<()> {
        log_op_start!("save", path = %self.path.display());
        let start = Instant::now();

        self.write_impl(store).map_err(|e| {
            log_op_error!(
                "save",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            "save",
            duration_ms = start.elapsed().as_millis() as u64,
            persons = store.persons().len() as u64,
            lessons = store.lessons().len() as u64
        );
        Ok(())
    }

    fn load_impl(&self) -> Result<Option<Store>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no data file yet");
                return Ok(None);
            }
            Err(e) => return Err(io_error("load", &self.path, e)),
        };

        let doc: StoreDocument = serde_json::from_str(&raw)
            .map_err(|e| serialization_error("load", &self.path, e))?;
        doc.into_store(&self.path).map(Some)
    }

    fn write_impl(&self, store: &Store) -> Result<()> {
        let json = serde_json::to_string_pretty(&StoreDocument::from_store(store))
            .map_err(|e| serialization_error("save", &self.path, e))?;
        atomic_write(&self.path, json.as_bytes())?;

        tracing::debug!(size_bytes = json.len(), "wrote data file");
        Ok(())
    }
}

impl Persistence for JsonFileStorage {
    fn save(&mut self, store: &Store) -> std::result::Result<(), PersistenceFailure> {
        self.write(store).map_err(|e| to_persistence_failure(&e))
    }
}
