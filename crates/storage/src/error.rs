//! Storage error types.

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An event payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
