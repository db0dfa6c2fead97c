//! Error types for the Field Operations Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all failure conditions the core can report to its callers.

use thiserror::Error;

/// The main error type for the Field Operations Engine.
///
/// Every operation in the core returns this error type, so callers can match
/// on the failure kind (validation, missing entity, illegal transition,
/// conflict, location failure) instead of parsing message strings.
///
/// # Example
///
/// ```
/// use fieldops_engine::error::CoreError;
///
/// let error = CoreError::validation("end_time", "must be after start_time");
/// assert_eq!(
///     error.to_string(),
///     "Validation failed for 'end_time': must be after start_time"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input was malformed: bad time window, blank reason, out-of-range
    /// coordinates, and similar caller mistakes.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity that was looked up (e.g. "schedule item").
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// The operation is not legal in the entity's current state.
    #[error("{entity} '{id}' cannot be modified: {message}")]
    InvalidState {
        /// The kind of entity being mutated.
        entity: String,
        /// The identifier of the entity.
        id: String,
        /// Why the transition was refused.
        message: String,
    },

    /// A concurrent mutation or double check-in was detected.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting operation.
        message: String,
    },

    /// The geolocation dependency failed or timed out.
    #[error("Location unavailable: {message}")]
    LocationUnavailable {
        /// The underlying location failure.
        message: String,
    },

    /// A configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl CoreError {
    /// Creates a validation error for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a not-found error for the given entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates an invalid-state error for the given entity.
    pub fn invalid_state(
        entity: impl Into<String>,
        id: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            entity: entity.into(),
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
