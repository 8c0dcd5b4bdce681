//! Error types for the construction-management backend engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions the engine can produce. The taxonomy is
//! deliberately small: malformed input, missing entity, failed authorization,
//! failed computation, and failed storage operation. Every failure path in
//! the crate surfaces exactly one of these; nothing is swallowed.

use thiserror::Error;

/// The main error type for the backend engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use buildtrack::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "project".to_string(),
///     id: "missing_id".to_string(),
/// };
/// assert_eq!(error.to_string(), "project not found: missing_id");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field was missing, malformed, or out of range.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A referenced entity does not exist in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up (e.g. "labour", "project").
        entity: String,
        /// The identifier that failed to resolve.
        id: String,
    },

    /// A bearer token was missing, malformed, or rejected by the
    /// identity provider.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// A description of the authorization failure.
        message: String,
    },

    /// A computation over well-formed inputs could not be completed,
    /// e.g. a priced material with no registered brands.
    #[error("Computation error: {message}")]
    Computation {
        /// A description of the computation error.
        message: String,
    },

    /// The underlying document store failed an operation. Not retried by
    /// this engine; retry policy belongs to the store client.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Convenience constructor for [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`EngineError::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
