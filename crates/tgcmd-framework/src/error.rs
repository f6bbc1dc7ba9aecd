//! Error types for the tgcmd framework.

use thiserror::Error;

use tgcmd_core::{ApiError, Identifier, SourceCastError};

/// Errors that can occur while extracting handler parameters.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// No resolver could supply a sender of the requested type.
    #[error("sender type mismatch: expected '{expected}'")]
    SenderTypeMismatch {
        /// Requested type name.
        expected: &'static str,
    },

    /// A resolver was handed an actor it does not understand.
    #[error("actor type mismatch: expected '{expected}'")]
    ActorTypeMismatch {
        /// Actor type the resolver expected.
        expected: &'static str,
    },

    /// The dispatch source is not the requested variant.
    #[error(transparent)]
    SourceCast(#[from] SourceCastError),

    /// No dependency of the requested type was registered.
    #[error("no dependency registered for '{type_name}'")]
    MissingDependency {
        /// Requested type name.
        type_name: &'static str,
    },

    /// A positional argument was not supplied.
    #[error("missing argument #{index}")]
    MissingArgument {
        /// Zero-based argument position.
        index: usize,
    },

    /// A positional argument could not be parsed.
    #[error("invalid argument #{index} '{value}': {reason}")]
    InvalidArgument {
        /// Zero-based argument position.
        index: usize,
        /// The raw argument.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Custom extraction error.
    #[error("{0}")]
    Custom(String),
}

impl ExtractError {
    /// Creates a custom extraction error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Errors surfaced while executing a command.
///
/// Every variant ends up at the engine's
/// [`ExceptionHandler`](crate::exception::ExceptionHandler).
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// A handler parameter could not be extracted.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The transport rejected an outbound call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A reply was attempted on a source with no chat to answer in.
    #[error("cannot reply to {source_id}: dispatch source has no chat")]
    DetachedSource {
        /// Id of the event that could not be answered.
        source_id: Identifier,
    },

    /// No command is registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The handler itself reported a failure.
    #[error("{0}")]
    Handler(String),
}

impl From<String> for CommandError {
    fn from(msg: String) -> Self {
        Self::Handler(msg)
    }
}

impl From<&str> for CommandError {
    fn from(msg: &str) -> Self {
        Self::Handler(msg.to_string())
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for command execution.
pub type CommandResult<T> = Result<T, CommandError>;
