use crate::shortener::MAX_TTL_MINUTES;
use thiserror::Error;

/// Errors related to the core types of the link engine.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors surfaced by a key-value [`Store`](crate::store::Store) adapter.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored value is invalid: {0}")]
    InvalidData(String),
    #[error("store serialization failed: {0}")]
    Serialization(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("{0}")]
    NotFound(String),
    #[error("ttl of {0} minutes exceeds the maximum of {max} minutes", max = MAX_TTL_MINUTES)]
    TtlTooLong(u64),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ShortenerError {
    /// HTTP-style status hint for transport adapters.
    pub fn status(&self) -> u16 {
        match self {
            ShortenerError::NotFound(_) => 404,
            ShortenerError::TtlTooLong(_) => 400,
            ShortenerError::Store(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShortenerError::NotFound(_))
    }
}
