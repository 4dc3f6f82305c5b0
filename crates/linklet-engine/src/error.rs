use linklet_core::{CoreError, StoreError};
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    /// No collision-free code could be generated. Either the code space
    /// is pathologically full or the forward index is unreachable; in
    /// both cases no valid code can be produced, so this is fatal.
    #[error("code space exhausted after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },
    #[error("index store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for EngineError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}
