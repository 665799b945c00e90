//! Wire-level error encoding
//!
//! The external API layer returns every lifecycle error as a stable
//! `{code, message, details}` object. Codes come from
//! `LifecycleError::error_code()` and are frozen; `details` carries the
//! structured fields of the variant.
//!
//! ```json
//! {
//!   "code": "InvalidTransition",
//!   "message": "illegal Lesson transition: COMPLETED -> REQUESTED",
//!   "details": {"kind": "Lesson", "from": "COMPLETED", "to": "REQUESTED"}
//! }
//! ```

use lessonlog_core::LifecycleError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// Wire representation of a lifecycle error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// Canonical error code (frozen)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Structured details, variant-dependent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl WireError {
    /// Create a wire error without details
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&LifecycleError> for WireError {
    fn from(err: &LifecycleError) -> Self {
        let details = match err {
            LifecycleError::Validation { reason } => Some(json!({ "reason": reason })),
            LifecycleError::InvalidTransition { kind, from, to } => Some(json!({
                "kind": kind.as_str(),
                "from": from,
                "to": to,
            })),
            LifecycleError::Ordering { prev, next } => Some(json!({
                "prev": prev.as_millis(),
                "next": next.as_millis(),
            })),
            LifecycleError::Mapping { owner, reason } => Some(json!({
                "owner": owner.to_string(),
                "reason": reason,
            })),
            LifecycleError::ConcurrentTransition {
                owner,
                expected,
                actual,
            } => Some(json!({
                "owner": owner.to_string(),
                "expected": expected,
                "actual": actual,
            })),
            LifecycleError::NotFound(owner) | LifecycleError::Conflict(owner) => {
                Some(json!({ "owner": owner.to_string() }))
            }
            LifecycleError::Storage(_) | LifecycleError::Internal(_) => None,
        };

        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}
