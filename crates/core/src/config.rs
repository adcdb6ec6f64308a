//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Services never read environment variables while handling an operation.

use crate::collection::CollectionKey;
use crate::constants::{COLLECTION_FILE_EXTENSION, DEFAULT_DATA_DIR};
use crate::{HospitalError, HospitalResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` rooted at `data_dir`.
    ///
    /// The directory does not need to exist yet; it is created by the first save.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::InvalidConfig` if `data_dir` is empty or whitespace.
    pub fn new(data_dir: PathBuf) -> HospitalResult<Self> {
        if data_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(HospitalError::InvalidConfig(
                "data directory cannot be empty".into(),
            ));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`, e.g. `<data_dir>/lab_tests.json`.
    pub fn collection_path(&self, key: CollectionKey) -> PathBuf {
        self.data_dir
            .join(key.as_str())
            .with_extension(COLLECTION_FILE_EXTENSION)
    }
}

/// Resolve the data directory from an optional environment value.
///
/// `None` or an empty/whitespace value falls back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::from("  ")).expect_err("blank dir should be rejected");
        assert!(matches!(err, HospitalError::InvalidConfig(_)));
    }

    #[test]
    fn test_collection_path_uses_key_and_extension() {
        let cfg = CoreConfig::new(PathBuf::from("/data")).unwrap();
        assert_eq!(
            cfg.collection_path(CollectionKey::LabTests),
            PathBuf::from("/data/lab_tests.json")
        );
    }

    #[test]
    fn test_data_dir_from_env_value_defaults() {
        assert_eq!(
            data_dir_from_env_value(None),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /srv/hms ".into())),
            PathBuf::from("/srv/hms")
        );
    }
}
