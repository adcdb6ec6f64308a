//! Constants used throughout the hospital core crate.

/// Default directory for collection files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "hospital_data";

/// File extension of every persisted collection.
pub const COLLECTION_FILE_EXTENSION: &str = "json";

/// Suffix appended to a collection file while a save is in flight.
pub const PENDING_WRITE_SUFFIX: &str = "tmp";

/// Bed availability shown on the dashboard. Beds are not tracked as records.
pub const AVAILABLE_BEDS: usize = 15;
