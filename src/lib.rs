//! # lessonlog
//!
//! Embedded status-lifecycle engine for a tutoring marketplace.
//!
//! lessonlog tracks the lifecycle of four entity kinds (Lessons,
//! LessonPlans, Milestones, and Goals) with one shared discipline: an
//! append-only status history per entity, a validated per-kind
//! transition graph, and a current-status pointer kept atomically
//! consistent with the history.
//!
//! ## Quick Start
//!
//! ```
//! use lessonlog::prelude::*;
//!
//! let db = LessonLog::open();
//!
//! // A lesson is born REQUESTED and moves through its graph.
//! let lesson = db.lessons.create(None, None)?;
//! db.lessons.quote(&lesson, None)?;
//! db.lessons.confirm(&lesson)?;
//!
//! // Reads reconstruct the entity from its row plus full history.
//! let entity = db.lessons.get(&lesson)?.expect("just created");
//! assert_eq!(entity.status(), Some(LessonStatus::Confirmed));
//! assert_eq!(entity.history_len(), 3);
//!
//! // Illegal transitions are rejected with no side effects.
//! assert!(db.lessons.complete(&lesson).is_ok());
//! assert!(db.lessons.start(&lesson).is_err());
//! # Ok::<(), lessonlog::Error>(())
//! ```
//!
//! ## Entity kinds
//!
//! - `db.lessons`: REQUESTED → QUOTED → CONFIRMED → IN_PROGRESS →
//!   COMPLETED, with CANCELLED / EXPIRED off-ramps
//! - `db.plans`: DRAFT → ACTIVE ⇄ PAUSED → COMPLETED / ABANDONED
//! - `db.milestones`: created bare, then PLANNED → IN_PROGRESS →
//!   ACHIEVED / SKIPPED
//! - `db.goals`: created bare, then PROPOSED → AGREED → ACHIEVED /
//!   DROPPED (AGREED may repeat with revised context)
//!
//! ## Guarantees
//!
//! - Status records are immutable and never deleted (owner deletion
//!   cascades the whole history).
//! - Every transition is validated against the kind's legal table; a
//!   rejected request persists nothing.
//! - Record insert and pointer update commit atomically per owner;
//!   same-owner races resolve to exactly one winner.
//! - Reads surface pointer/history divergence instead of crashing, and
//!   the write path self-heals it (configurable).

#![warn(missing_docs)]

mod entities;
mod error;
mod tracker;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use tracker::{LessonLog, LessonLogBuilder};

// Re-export facade handles
pub use entities::{Goals, Lessons, Milestones, Plans};

// Re-export the vocabulary callers need
pub use lessonlog_api::{Entity, Goal, Integrity, Lesson, LessonPlan, Milestone, StatusEntry, WireError};
pub use lessonlog_core::status::{GoalStatus, LessonStatus, MilestoneStatus, PlanStatus, StatusKind};
pub use lessonlog_core::transitions::TransitionValidator;
pub use lessonlog_core::types::{EntityKind, OwnerId, StatusId, Timestamp};
pub use lessonlog_lifecycle::DivergencePolicy;
