//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The database file does not exist.
    ///
    /// This typically means no run has been recorded yet.
    #[error("database not found at {path}. Run 'waypoint plan' first")]
    DatabaseNotFound { path: PathBuf },

    /// No run was found matching the given prefix.
    #[error("no run found matching '{prefix}'")]
    RunNotFound { prefix: String },

    /// Multiple runs match the given prefix.
    ///
    /// The user should provide a longer prefix to disambiguate.
    #[error("multiple runs match '{prefix}': {matches:?}")]
    AmbiguousRun {
        prefix: String,
        matches: Vec<String>,
    },

    /// A date argument could not be parsed.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The vacation inputs are invalid.
    #[error("invalid vacation info: {0}")]
    Vacation(#[from] travel::ValidationError),

    /// Configuration is invalid or missing required fields.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Itinerary generation failed.
    #[error(transparent)]
    Planner(#[from] travel::PlannerError),

    /// An error occurred in the engine layer.
    #[error(transparent)]
    Engine(#[from] engine::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// A value could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
