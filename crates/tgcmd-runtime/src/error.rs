//! Runtime error types.

use thiserror::Error;

use tgcmd_core::SourceError;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An update payload was not valid Bot API JSON.
    #[error("invalid update payload: {0}")]
    InvalidUpdate(#[from] serde_json::Error),

    /// An update could not be turned into a dispatch source.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The global logging subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
