//! Whole-collection JSON storage.
//!
//! Each collection lives in a single pretty-printed JSON array file under the configured data
//! directory:
//!
//! ```text
//! <data_dir>/
//!   patients.json
//!   doctors.json
//!   ...
//!   billing.json
//! ```
//!
//! There are no partial updates. Callers load the full collection, transform it and save it
//! back. A save writes a sibling `.tmp` file and renames it over the target, so a reader sees
//! either the old or the new collection, never a truncated one. There is no locking: with two
//! writers the last save wins.

use crate::collection::CollectionKey;
use crate::config::CoreConfig;
use crate::constants::{COLLECTION_FILE_EXTENSION, PENDING_WRITE_SUFFIX};
use crate::error::StorageError;
use crate::record::Record;
use crate::{HospitalError, HospitalResult};
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

/// Reads and writes whole collections.
#[derive(Clone, Debug)]
pub struct RecordStore {
    cfg: Arc<CoreConfig>,
}

impl RecordStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Loads every record of `key` in persisted order.
    ///
    /// A collection whose file does not exist yet is empty.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::StorageUnavailable` if the file exists but cannot be read, or if
    /// its content is not a JSON array of objects with scalar values. Malformed content is
    /// never treated as an empty collection.
    pub fn load(&self, key: CollectionKey) -> HospitalResult<Vec<Record>> {
        let path = self.cfg.collection_path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no file for {} at {}, treating as empty", key, path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(HospitalError::storage(key, StorageError::Read(e))),
        };

        let mut deserializer = serde_json::Deserializer::from_str(&contents);
        let records = match serde_path_to_error::deserialize::<_, Vec<Record>>(&mut deserializer) {
            Ok(records) => records,
            Err(err) => {
                let at = err.path().to_string();
                let source = err.into_inner();
                let at = if at.is_empty() || at == "." {
                    "<root>"
                } else {
                    at.as_str()
                };
                return Err(HospitalError::storage(
                    key,
                    StorageError::Malformed(format!("{} at {at}: {source}", path.display())),
                ));
            }
        };
        deserializer.end().map_err(|e| {
            HospitalError::storage(
                key,
                StorageError::Malformed(format!("{}: {e}", path.display())),
            )
        })?;

        tracing::debug!("loaded {} {} record(s)", records.len(), key);
        Ok(records)
    }

    /// Replaces the persisted collection `key` with `records`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::StorageUnavailable` if the data directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self, key: CollectionKey, records: &[Record]) -> HospitalResult<()> {
        let path = self.cfg.collection_path(key);
        let storage_err = |source: StorageError| HospitalError::storage(key, source);

        fs::create_dir_all(self.cfg.data_dir())
            .map_err(|e| storage_err(StorageError::Write(e)))?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| storage_err(StorageError::Serialisation(e)))?;

        let pending =
            path.with_extension(format!("{COLLECTION_FILE_EXTENSION}.{PENDING_WRITE_SUFFIX}"));
        fs::write(&pending, json).map_err(|e| storage_err(StorageError::Write(e)))?;
        if let Err(e) = fs::rename(&pending, &path) {
            let _ = fs::remove_file(&pending);
            return Err(storage_err(StorageError::Write(e)));
        }

        tracing::debug!("saved {} {} record(s) to {}", records.len(), key, path.display());
        Ok(())
    }
}
