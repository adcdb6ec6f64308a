use crate::collection::CollectionKey;

/// Low-level reasons a collection could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read collection file: {0}")]
    Read(std::io::Error),
    #[error("failed to write collection file: {0}")]
    Write(std::io::Error),
    #[error("malformed collection content: {0}")]
    Malformed(String),
    #[error("failed to serialise collection: {0}")]
    Serialisation(serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum HospitalError {
    #[error("{0} is required")]
    MissingField(String),
    #[error("{0} must be a number")]
    InvalidNumber(String),
    #[error("date must be in YYYY-MM-DD format")]
    InvalidDate,
    #[error("time must be in HH:MM format")]
    InvalidTime,
    #[error("no record selected")]
    NoSelection,
    #[error("selection has {actual} values but the record has {expected} fields")]
    SelectionMismatch { expected: usize, actual: usize },
    #[error("unknown medicine: {0}")]
    UnknownMedicine(String),
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable for {key}: {source}")]
    StorageUnavailable {
        key: CollectionKey,
        #[source]
        source: StorageError,
    },
}

impl HospitalError {
    /// True for errors caused by operator input, as opposed to storage or configuration.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HospitalError::MissingField(_)
                | HospitalError::InvalidNumber(_)
                | HospitalError::InvalidDate
                | HospitalError::InvalidTime
                | HospitalError::NoSelection
                | HospitalError::SelectionMismatch { .. }
        )
    }

    pub(crate) fn storage(key: CollectionKey, source: StorageError) -> Self {
        HospitalError::StorageUnavailable { key, source }
    }
}

pub type HospitalResult<T> = std::result::Result<T, HospitalError>;
