//! Convenience re-exports.
//!
//! ```
//! use lessonlog::prelude::*;
//! let db = LessonLog::open();
//! # let _ = db;
//! ```

pub use crate::error::{Error, Result};
pub use crate::tracker::{LessonLog, LessonLogBuilder};

pub use lessonlog_api::{Entity, Goal, Integrity, Lesson, LessonPlan, Milestone, StatusEntry};
pub use lessonlog_core::status::{
    GoalStatus, LessonStatus, MilestoneStatus, PlanStatus, StatusKind,
};
pub use lessonlog_core::types::{EntityKind, OwnerId, StatusId, Timestamp};
pub use lessonlog_lifecycle::DivergencePolicy;
