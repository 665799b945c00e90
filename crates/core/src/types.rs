//! Core identifier and time types
//!
//! This module defines the fundamental types used throughout the system:
//! - [`OwnerId`]: unique identifier for a status-carrying entity
//! - [`StatusId`]: unique identifier for one status record
//! - [`EntityKind`]: the four entity kinds that carry a status lifecycle
//! - [`Timestamp`]: millisecond-precision wall-clock time

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an owning entity (Lesson, LessonPlan, Milestone, Goal)
///
/// OwnerId is used throughout the system to identify the entity a status
/// history belongs to. It appears in:
/// - Status records (`owner_id` back-reference)
/// - Storage keys for per-owner sharding
/// - Error values naming the affected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Create a new random OwnerId using UUID v4
    pub fn new() -> Self {
        OwnerId(Uuid::new_v4())
    }

    /// Create OwnerId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        OwnerId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single status record
///
/// Each appended status fact gets its own StatusId. The owning entity's
/// `current_status_id` pointer references one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusId(Uuid);

impl StatusId {
    /// Create a new random StatusId using UUID v4
    pub fn new() -> Self {
        StatusId(Uuid::new_v4())
    }

    /// Create StatusId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        StatusId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for StatusId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four entity kinds that carry a status lifecycle
///
/// Every status record and every owner row is tagged with its kind.
/// The kind selects the status enumeration and the legal-transition
/// table that govern the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A tutoring lesson (child of a quote)
    Lesson,
    /// A lesson plan (child of a lesson)
    LessonPlan,
    /// A milestone within a lesson plan
    Milestone,
    /// A learning goal attached to a lesson
    Goal,
}

impl EntityKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Lesson => "Lesson",
            EntityKind::LessonPlan => "LessonPlan",
            EntityKind::Milestone => "Milestone",
            EntityKind::Goal => "Goal",
        }
    }

    /// Parse a kind from its string representation
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Lesson" => Some(EntityKind::Lesson),
            "LessonPlan" => Some(EntityKind::LessonPlan),
            "Milestone" => Some(EntityKind::Milestone),
            "Goal" => Some(EntityKind::Goal),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Millisecond-precision wall-clock timestamp
///
/// Stored as milliseconds since the Unix epoch. Status histories are
/// ordered by this value, non-decreasing; ties are broken by insertion
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current server time
    pub fn now() -> Self {
        Timestamp(chrono::Utc::now().timestamp_millis())
    }

    /// Construct from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Milliseconds since the Unix epoch
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whether this timestamp lies in the future relative to the server clock
    pub fn is_future(&self) -> bool {
        self.0 > Self::now().0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
