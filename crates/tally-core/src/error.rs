use thiserror::Error;

/// Application-wide error types.
///
/// Every failure a report query can surface flows through this enum. The
/// database crate maps driver errors into the two store variants so that core
/// code (and the in-memory store) never depends on a concrete driver.
#[derive(Error, Debug)]
pub enum AppError {
    /// A query was rejected or failed while executing on the data store.
    #[error("Store error: {0}")]
    StoreError(String),

    /// The data store could not be reached at all.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
