//! Error taxonomy for the lifecycle core
//!
//! Every failure mode maps to a distinct, stable error code returned to
//! the external API layer. The codes are frozen and must not change:
//!
//! | Code | Description |
//! |------|-------------|
//! | Validation | Malformed status input (bad enum member, future timestamp) |
//! | InvalidTransition | Requested transition not in the legal table |
//! | Ordering | Timestamp regression in a status history |
//! | Mapping | Persisted data violates the current-status invariant |
//! | ConcurrentTransition | Losing side of a same-owner race |
//! | NotFound | Owner does not exist |
//! | Conflict | Owner id already exists |
//! | Storage | Store-level failure |
//! | Internal | Bug or invariant violation |
//!
//! None of these are silently swallowed. The one documented degradation
//! is the read-path fallback-status substitution in the mapper, which is
//! logged at warn level rather than raised.

use crate::types::{EntityKind, OwnerId, Timestamp};
use thiserror::Error;

/// All lifecycle-core errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LifecycleError {
    /// Malformed status input: unknown enumeration member, future
    /// timestamp from an untrusted source, kind mismatch.
    /// Rejected before anything is persisted.
    #[error("validation failed: {reason}")]
    Validation {
        /// Why the input was rejected
        reason: String,
    },

    /// Requested transition is not in the kind's legal table.
    /// Surfaced to the caller as a rejected request; not retried.
    #[error("illegal {kind} transition: {} -> {to}", .from.unwrap_or("<none>"))]
    InvalidTransition {
        /// Entity kind whose table rejected the pair
        kind: EntityKind,
        /// Current status, or None for a first transition
        from: Option<&'static str>,
        /// Requested status
        to: &'static str,
    },

    /// Timestamp regression in a status history. A programmer or
    /// integration error: the service assigns timestamps from the server
    /// clock, so this only fires on clock regression or drifted imports.
    #[error("status timestamp regression: {prev} -> {next}")]
    Ordering {
        /// Timestamp of the record currently at the head
        prev: Timestamp,
        /// Offending earlier timestamp
        next: Timestamp,
    },

    /// Persisted data violates the current-status invariant. The read
    /// fails rather than returning a corrupted entity.
    #[error("mapping failed for {owner}: {reason}")]
    Mapping {
        /// Owner whose row failed to map
        owner: OwnerId,
        /// Which invariant was violated
        reason: String,
    },

    /// Losing side of a same-owner race. The caller is expected to retry
    /// with fresh current-status context; the core never retries.
    #[error("concurrent transition on {owner}: expected version {expected}, found {actual}")]
    ConcurrentTransition {
        /// Contended owner
        owner: OwnerId,
        /// Version the caller validated against
        expected: u64,
        /// Version actually found at commit time
        actual: u64,
    },

    /// Owner does not exist
    #[error("owner not found: {0}")]
    NotFound(OwnerId),

    /// Owner id already exists
    #[error("owner already exists: {0}")]
    Conflict(OwnerId),

    /// Store-level failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Bug or invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for lifecycle-core operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;

impl LifecycleError {
    /// Get the canonical error code
    pub fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::Validation { .. } => "Validation",
            LifecycleError::InvalidTransition { .. } => "InvalidTransition",
            LifecycleError::Ordering { .. } => "Ordering",
            LifecycleError::Mapping { .. } => "Mapping",
            LifecycleError::ConcurrentTransition { .. } => "ConcurrentTransition",
            LifecycleError::NotFound(_) => "NotFound",
            LifecycleError::Conflict(_) => "Conflict",
            LifecycleError::Storage(_) => "Storage",
            LifecycleError::Internal(_) => "Internal",
        }
    }

    /// Whether a retry with fresh current-status context may succeed.
    ///
    /// True only for the losing side of a race.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LifecycleError::ConcurrentTransition { .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LifecycleError::NotFound(_))
    }

    /// Check if this is a rejected-transition error.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, LifecycleError::InvalidTransition { .. })
    }

    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        LifecycleError::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a mapping failure.
    pub fn mapping(owner: OwnerId, reason: impl Into<String>) -> Self {
        LifecycleError::Mapping {
            owner,
            reason: reason.into(),
        }
    }
}
