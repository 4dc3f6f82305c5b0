use thiserror::Error;

/// Result type for persistence backend operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Errors raised by [`PersistenceBackend`](crate::backend::PersistenceBackend)
/// implementations.
///
/// These never escape the [`PersistenceAdapter`](crate::adapter::PersistenceAdapter)
/// boundary; the adapter logs them and degrades to the documented defaults.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("persistence backend unavailable: {0}")]
    Unavailable(String),
    #[error("persistence operation timed out: {0}")]
    Timeout(String),
    #[error("persisted data is invalid: {0}")]
    InvalidData(String),
    #[error("persistence operation failed: {0}")]
    Operation(String),
}
