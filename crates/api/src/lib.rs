//! Read-side API layer for the lesson-lifecycle engine
//!
//! Domain entity shapes, the generic persisted-row → domain mapper, and
//! the wire encoding of the frozen error taxonomy.

pub mod domain;
pub mod mapper;
pub mod wire;

pub use domain::{Entity, Goal, Integrity, Lesson, LessonPlan, Milestone, StatusEntry};
pub use mapper::EntityMapper;
pub use wire::WireError;
