//! Error taxonomy shared by the authorization engine, the membership state
//! machine, and the store-backed operations.
//!
//! Every rejected precondition surfaces as a typed variant; nothing is
//! caught and swallowed. The API layer maps these onto transport-level
//! status codes.

use thiserror::Error;

/// Errors returned by hub operations.
#[derive(Debug, Error)]
pub enum HubError {
    /// The actor lacks the role or relationship required for the action.
    #[error("permission denied: {0}")]
    Permission(String),
    /// A referenced id or join code does not exist in the store.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The requested transition is invalid for the entity's current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The request is structurally invalid.
    #[error("invalid request: {0}")]
    Validation(String),
    /// An underlying database failure.
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

impl HubError {
    /// Build a [`HubError::Permission`] from any message.
    #[must_use]
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Build a [`HubError::Conflict`] from any message.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Build a [`HubError::Validation`] from any message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error is a unique-constraint violation surfaced by the
    /// database, used to convert racy double inserts into typed conflicts.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}
