//! Engine error types.

use crate::model::ModelError;
use thiserror::Error;

/// Errors that terminate a loop run.
///
/// Recoverable failures (parse errors, unknown tools, bad tool arguments)
/// never surface here — they are converted into observations and the loop
/// continues. What remains is fatal: the collaborator call failed, the
/// trace could not be written, or the loop was misconfigured.
#[derive(Debug, Error)]
pub enum Error {
    /// The model call failed; no local recovery is possible.
    #[error("model backend: {0}")]
    Model(#[from] ModelError),

    /// A tool name was registered twice.
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),

    /// The loop configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
