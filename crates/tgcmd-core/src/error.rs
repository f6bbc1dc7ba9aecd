//! Unified error types for the tgcmd core.
//!
//! This module provides the error types raised by identifiers, dispatch sources
//! and transport calls. Framework-level errors (like `ExtractError`) are defined
//! in tgcmd-framework.

use thiserror::Error;

use crate::dispatch::SourceKind;
use crate::identifier::IdentifierKind;

// =============================================================================
// Identifier Errors
// =============================================================================

/// Errors raised when reading or constructing an [`Identifier`](crate::Identifier).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier holds a different representation than the one requested.
    #[error("cannot represent {actual} identifier as {requested}")]
    RepresentationMismatch {
        /// The representation the caller asked for.
        requested: IdentifierKind,
        /// The representation actually held.
        actual: IdentifierKind,
    },

    /// A required identifier value was absent.
    #[error("missing value for {0} identifier")]
    Missing(IdentifierKind),
}

// =============================================================================
// Dispatch Source Errors
// =============================================================================

/// Returned when a dispatch source is narrowed to a variant it is not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot cast {actual} dispatch source to {expected}")]
pub struct SourceCastError {
    /// The variant the caller asked for.
    pub expected: SourceKind,
    /// The variant actually held.
    pub actual: SourceKind,
}

/// Errors that can occur while building a dispatch source from an update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The inbound event carries no author record.
    #[error("{kind} event has no author")]
    MissingAuthor {
        /// The kind of event that was missing its author.
        kind: SourceKind,
    },

    /// The update holds no event kind that can be dispatched.
    #[error("update {update_id} has no dispatchable event")]
    UnsupportedUpdate {
        /// The update's id.
        update_id: i64,
    },
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for transport API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,
    /// The Bot API answered with `ok: false`.
    #[error("API error ({error_code}): {description}")]
    Api {
        /// Bot API error code.
        error_code: i64,
        /// Human-readable description returned by the API.
        description: String,
    },
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for identifier operations.
pub type IdentifierResult<T> = Result<T, IdentifierError>;

/// Result type for building dispatch sources.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
