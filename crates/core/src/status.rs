//! Status enumerations and the per-kind lifecycle descriptor
//!
//! Each of the four entity kinds has its own status enumeration, but all
//! four follow the same discipline: an append-only history, a legal
//! transition table, and a current-status pointer. The [`StatusKind`]
//! trait is the descriptor that captures what differs between kinds as
//! data (the enumeration members, the transition table, the valid first
//! statuses, and the read-path fallback) so the history, validator,
//! service, and mapper are written once, generically.
//!
//! ## Transition graphs
//!
//! Lesson:
//! - REQUESTED → QUOTED, CONFIRMED, CANCELLED, EXPIRED
//! - QUOTED → CONFIRMED, CANCELLED, EXPIRED
//! - CONFIRMED → IN_PROGRESS, COMPLETED, CANCELLED
//! - IN_PROGRESS → COMPLETED, CANCELLED
//! - COMPLETED, CANCELLED, EXPIRED are terminal (no resurrection)
//!
//! LessonPlan:
//! - DRAFT → ACTIVE, ABANDONED
//! - ACTIVE → PAUSED, COMPLETED, ABANDONED
//! - PAUSED → ACTIVE, ABANDONED
//! - COMPLETED, ABANDONED are terminal
//!
//! Milestone:
//! - PLANNED → IN_PROGRESS, ACHIEVED, SKIPPED
//! - IN_PROGRESS → ACHIEVED, SKIPPED
//! - ACHIEVED, SKIPPED are terminal
//!
//! Goal:
//! - PROPOSED → AGREED, DROPPED
//! - AGREED → AGREED, ACHIEVED, DROPPED
//! - ACHIEVED, DROPPED are terminal
//!
//! Requesting the status an entity already holds is rejected unless the
//! table lists the self-loop explicitly. Goal AGREED → AGREED is the one
//! whitelisted self-loop: a goal can be re-agreed with revised context.

use crate::types::EntityKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Descriptor for one entity kind's status lifecycle
///
/// Implemented by each status enumeration. Everything the generic
/// machinery needs to know about a kind lives here, as data:
///
/// - `KIND`: which entity kind this enumeration belongs to
/// - `ALL`: every enumeration member (for audits and table-driven tests)
/// - `INITIAL`: statuses a fresh entity (empty history) may enter
/// - `INITIAL_RECORD_REQUIRED`: whether entities of this kind are created
///   together with their first status record (Lesson, LessonPlan) or
///   bare (Milestone, Goal)
/// - `transitions`: the legal-transition table, one row per member
/// - `fallback`: the documented read-path substitute for status strings
///   that no longer parse (historical drift); write paths never use it
pub trait StatusKind:
    Copy + Eq + std::hash::Hash + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The entity kind this enumeration belongs to
    const KIND: EntityKind;

    /// Every member of the enumeration
    const ALL: &'static [Self];

    /// Statuses reachable from entity creation (valid when history is empty)
    const INITIAL: &'static [Self];

    /// Whether this kind is created together with its first status record
    const INITIAL_RECORD_REQUIRED: bool;

    /// Legal transitions out of `self`
    fn transitions(self) -> &'static [Self];

    /// Read-path fallback for unparseable historical status strings
    fn fallback() -> Self;

    /// Persisted string form (SCREAMING_SNAKE)
    fn as_str(&self) -> &'static str;

    /// Parse the persisted string form
    fn parse(raw: &str) -> Option<Self>;

    /// Whether `self` is terminal (no legal transition out)
    fn is_terminal(self) -> bool {
        self.transitions().is_empty()
    }
}

// =============================================================================
// Lesson
// =============================================================================

/// Lifecycle status of a Lesson
///
/// A lesson is born REQUESTED (a student asked for it), may be QUOTED by
/// a teacher, becomes CONFIRMED when the quote is accepted, runs through
/// IN_PROGRESS to COMPLETED, or ends in CANCELLED / EXPIRED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    /// Student requested the lesson
    Requested,
    /// A teacher quoted the request
    Quoted,
    /// Quote accepted; lesson is booked
    Confirmed,
    /// Lesson is being taught
    InProgress,
    /// Lesson finished normally
    Completed,
    /// Called off by either party
    Cancelled,
    /// Request or quote lapsed without confirmation
    Expired,
}

impl StatusKind for LessonStatus {
    const KIND: EntityKind = EntityKind::Lesson;

    const ALL: &'static [Self] = &[
        LessonStatus::Requested,
        LessonStatus::Quoted,
        LessonStatus::Confirmed,
        LessonStatus::InProgress,
        LessonStatus::Completed,
        LessonStatus::Cancelled,
        LessonStatus::Expired,
    ];

    const INITIAL: &'static [Self] = &[LessonStatus::Requested];

    const INITIAL_RECORD_REQUIRED: bool = true;

    fn transitions(self) -> &'static [Self] {
        use LessonStatus::*;
        match self {
            Requested => &[Quoted, Confirmed, Cancelled, Expired],
            Quoted => &[Confirmed, Cancelled, Expired],
            Confirmed => &[InProgress, Completed, Cancelled],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled | Expired => &[],
        }
    }

    fn fallback() -> Self {
        LessonStatus::Requested
    }

    fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Requested => "REQUESTED",
            LessonStatus::Quoted => "QUOTED",
            LessonStatus::Confirmed => "CONFIRMED",
            LessonStatus::InProgress => "IN_PROGRESS",
            LessonStatus::Completed => "COMPLETED",
            LessonStatus::Cancelled => "CANCELLED",
            LessonStatus::Expired => "EXPIRED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REQUESTED" => Some(LessonStatus::Requested),
            "QUOTED" => Some(LessonStatus::Quoted),
            "CONFIRMED" => Some(LessonStatus::Confirmed),
            "IN_PROGRESS" => Some(LessonStatus::InProgress),
            "COMPLETED" => Some(LessonStatus::Completed),
            "CANCELLED" => Some(LessonStatus::Cancelled),
            "EXPIRED" => Some(LessonStatus::Expired),
            _ => None,
        }
    }
}

impl std::fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// LessonPlan
// =============================================================================

/// Lifecycle status of a LessonPlan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Being drafted by the teacher
    Draft,
    /// Plan is in use
    Active,
    /// Temporarily on hold
    Paused,
    /// All planned work done
    Completed,
    /// Plan given up
    Abandoned,
}

impl StatusKind for PlanStatus {
    const KIND: EntityKind = EntityKind::LessonPlan;

    const ALL: &'static [Self] = &[
        PlanStatus::Draft,
        PlanStatus::Active,
        PlanStatus::Paused,
        PlanStatus::Completed,
        PlanStatus::Abandoned,
    ];

    const INITIAL: &'static [Self] = &[PlanStatus::Draft];

    const INITIAL_RECORD_REQUIRED: bool = true;

    fn transitions(self) -> &'static [Self] {
        use PlanStatus::*;
        match self {
            Draft => &[Active, Abandoned],
            Active => &[Paused, Completed, Abandoned],
            Paused => &[Active, Abandoned],
            Completed | Abandoned => &[],
        }
    }

    fn fallback() -> Self {
        PlanStatus::Draft
    }

    fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "DRAFT",
            PlanStatus::Active => "ACTIVE",
            PlanStatus::Paused => "PAUSED",
            PlanStatus::Completed => "COMPLETED",
            PlanStatus::Abandoned => "ABANDONED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(PlanStatus::Draft),
            "ACTIVE" => Some(PlanStatus::Active),
            "PAUSED" => Some(PlanStatus::Paused),
            "COMPLETED" => Some(PlanStatus::Completed),
            "ABANDONED" => Some(PlanStatus::Abandoned),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Milestone
// =============================================================================

/// Lifecycle status of a Milestone
///
/// Milestones are created bare; PLANNED arrives as the first recorded
/// status once the milestone is scheduled into the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    /// Scheduled into the plan
    Planned,
    /// Being worked toward
    InProgress,
    /// Reached
    Achieved,
    /// Deliberately passed over
    Skipped,
}

impl StatusKind for MilestoneStatus {
    const KIND: EntityKind = EntityKind::Milestone;

    const ALL: &'static [Self] = &[
        MilestoneStatus::Planned,
        MilestoneStatus::InProgress,
        MilestoneStatus::Achieved,
        MilestoneStatus::Skipped,
    ];

    const INITIAL: &'static [Self] = &[MilestoneStatus::Planned];

    const INITIAL_RECORD_REQUIRED: bool = false;

    fn transitions(self) -> &'static [Self] {
        use MilestoneStatus::*;
        match self {
            Planned => &[InProgress, Achieved, Skipped],
            InProgress => &[Achieved, Skipped],
            Achieved | Skipped => &[],
        }
    }

    fn fallback() -> Self {
        MilestoneStatus::Planned
    }

    fn as_str(&self) -> &'static str {
        match self {
            MilestoneStatus::Planned => "PLANNED",
            MilestoneStatus::InProgress => "IN_PROGRESS",
            MilestoneStatus::Achieved => "ACHIEVED",
            MilestoneStatus::Skipped => "SKIPPED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PLANNED" => Some(MilestoneStatus::Planned),
            "IN_PROGRESS" => Some(MilestoneStatus::InProgress),
            "ACHIEVED" => Some(MilestoneStatus::Achieved),
            "SKIPPED" => Some(MilestoneStatus::Skipped),
            _ => None,
        }
    }
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Goal
// =============================================================================

/// Lifecycle status of a Goal
///
/// AGREED → AGREED is the one whitelisted self-loop in the system: the
/// student and teacher may re-agree a goal with revised context without
/// that counting as a new lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    /// Suggested by student or teacher
    Proposed,
    /// Both parties committed to it
    Agreed,
    /// Goal met
    Achieved,
    /// No longer pursued
    Dropped,
}

impl StatusKind for GoalStatus {
    const KIND: EntityKind = EntityKind::Goal;

    const ALL: &'static [Self] = &[
        GoalStatus::Proposed,
        GoalStatus::Agreed,
        GoalStatus::Achieved,
        GoalStatus::Dropped,
    ];

    const INITIAL: &'static [Self] = &[GoalStatus::Proposed];

    const INITIAL_RECORD_REQUIRED: bool = false;

    fn transitions(self) -> &'static [Self] {
        use GoalStatus::*;
        match self {
            Proposed => &[Agreed, Dropped],
            Agreed => &[Agreed, Achieved, Dropped],
            Achieved | Dropped => &[],
        }
    }

    fn fallback() -> Self {
        GoalStatus::Proposed
    }

    fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Proposed => "PROPOSED",
            GoalStatus::Agreed => "AGREED",
            GoalStatus::Achieved => "ACHIEVED",
            GoalStatus::Dropped => "DROPPED",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PROPOSED" => Some(GoalStatus::Proposed),
            "AGREED" => Some(GoalStatus::Agreed),
            "ACHIEVED" => Some(GoalStatus::Achieved),
            "DROPPED" => Some(GoalStatus::Dropped),
            _ => None,
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
