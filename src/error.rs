//! Unified error types for lessonlog.
//!
//! This module provides a clean error type that wraps internal errors
//! and presents a consistent interface to users. Every variant maps to
//! one of the frozen error codes (see `lessonlog-core`).

use lessonlog_core::types::EntityKind;
use lessonlog_core::LifecycleError;
use thiserror::Error;

/// All lessonlog errors.
///
/// This is the canonical error type for all facade operations. It hides
/// internal error details behind stable codes and messages.
#[derive(Debug, Error)]
pub enum Error {
    /// Owner not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed status input (bad enum member, future timestamp,
    /// kind mismatch)
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested transition not in the legal table
    #[error("illegal {kind} transition: {} -> {to}", .from.unwrap_or("<none>"))]
    InvalidTransition {
        /// Entity kind whose table rejected the pair
        kind: EntityKind,
        /// Current status, or None for a first transition
        from: Option<&'static str>,
        /// Requested status
        to: &'static str,
    },

    /// Timestamp regression in a status history
    #[error("ordering violation: {0}")]
    Ordering(String),

    /// Persisted data violates the current-status invariant
    #[error("mapping failed: {0}")]
    Mapping(String),

    /// Losing side of a same-owner race; retry with fresh state
    #[error("concurrent transition: {0}")]
    ConcurrentTransition(String),

    /// Owner id already exists
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for lessonlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The canonical error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NotFound",
            Error::Validation(_) => "Validation",
            Error::InvalidTransition { .. } => "InvalidTransition",
            Error::Ordering(_) => "Ordering",
            Error::Mapping(_) => "Mapping",
            Error::ConcurrentTransition(_) => "ConcurrentTransition",
            Error::Conflict(_) => "Conflict",
            Error::Storage(_) => "Storage",
            Error::Internal(_) => "Internal",
        }
    }

    /// Check if a retry with fresh current-status context may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ConcurrentTransition(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a rejected-transition error.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Error::InvalidTransition { .. })
    }
}

// Convert from internal core errors
impl From<LifecycleError> for Error {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation { reason } => Error::Validation(reason),
            LifecycleError::InvalidTransition { kind, from, to } => {
                Error::InvalidTransition { kind, from, to }
            }
            LifecycleError::Ordering { prev, next } => {
                Error::Ordering(format!("timestamp regression: {} -> {}", prev, next))
            }
            LifecycleError::Mapping { owner, reason } => {
                Error::Mapping(format!("{}: {}", owner, reason))
            }
            LifecycleError::ConcurrentTransition {
                owner,
                expected,
                actual,
            } => Error::ConcurrentTransition(format!(
                "{}: expected version {}, found {}",
                owner, expected, actual
            )),
            LifecycleError::NotFound(owner) => Error::NotFound(owner.to_string()),
            LifecycleError::Conflict(owner) => Error::Conflict(owner.to_string()),
            LifecycleError::Storage(message) => Error::Storage(message),
            LifecycleError::Internal(message) => Error::Internal(message),
        }
    }
}
