//! Domain entity shapes handed to callers
//!
//! One generic [`Entity`] parameterized by the kind descriptor, with
//! type aliases and typed parent accessors per kind. These are the
//! objects an external API layer serializes to JSON; the core defines no
//! wire format of its own.

use lessonlog_core::status::{GoalStatus, LessonStatus, MilestoneStatus, PlanStatus, StatusKind};
use lessonlog_core::types::{OwnerId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Read-path integrity verdict for a mapped entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Integrity {
    /// Pointer and history agree
    Consistent,
    /// The stored pointer lagged the history; the entity was surfaced
    /// with history's latest record as its current status
    Diverged,
}

/// One history entry of a mapped entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: StatusKind")]
pub struct StatusEntry<S: StatusKind> {
    /// Record identifier
    pub id: StatusId,
    /// Status held (fallback-substituted if the stored string drifted)
    pub status: S,
    /// Opaque context payload
    pub context: Option<JsonValue>,
    /// When the status was recorded
    pub created_at: Timestamp,
}

/// A status-carrying entity reconstructed from its persisted row and
/// full status history
///
/// `current` is `None` only for bare-created kinds that have not yet
/// received their first status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: StatusKind")]
pub struct Entity<S: StatusKind> {
    /// Entity identifier
    pub id: OwnerId,
    /// Parent reference, kind-dependent (see the aliases' accessors)
    pub parent_id: Option<Uuid>,
    /// Opaque owner metadata
    pub metadata: Option<JsonValue>,
    /// When the entity was created
    pub created_at: Timestamp,
    /// Current status entry
    pub current: Option<StatusEntry<S>>,
    /// Full status history, oldest first
    pub history: Vec<StatusEntry<S>>,
    /// Whether the persisted pointer agreed with the history
    pub integrity: Integrity,
}

impl<S: StatusKind> Entity<S> {
    /// Current status value, if the entity has one
    pub fn status(&self) -> Option<S> {
        self.current.as_ref().map(|entry| entry.status)
    }

    /// Number of recorded status facts
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

/// A tutoring lesson
pub type Lesson = Entity<LessonStatus>;

/// A lesson plan
pub type LessonPlan = Entity<PlanStatus>;

/// A milestone within a lesson plan
pub type Milestone = Entity<MilestoneStatus>;

/// A learning goal attached to a lesson
pub type Goal = Entity<GoalStatus>;

impl Entity<LessonStatus> {
    /// The quote this lesson was confirmed from
    pub fn quote_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}

impl Entity<PlanStatus> {
    /// The lesson this plan belongs to
    pub fn lesson_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}

impl Entity<MilestoneStatus> {
    /// The lesson plan this milestone belongs to
    pub fn plan_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}

impl Entity<GoalStatus> {
    /// The lesson this goal is attached to
    pub fn lesson_id(&self) -> Option<Uuid> {
        self.parent_id
    }
}
