//! Lesson lifecycle operations.
//!
//! The Lessons handle covers the full lesson arc: created REQUESTED,
//! optionally QUOTED, then CONFIRMED → IN_PROGRESS → COMPLETED, with
//! CANCELLED and EXPIRED as the off-ramps.

use crate::error::Result;
use crate::tracker::Inner;
use lessonlog_api::{EntityMapper, Lesson, StatusEntry};
use lessonlog_core::status::{LessonStatus, StatusKind};
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_storage::StatusStore;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;

/// Lesson lifecycle operations.
///
/// Access via `db.lessons`.
pub struct Lessons {
    inner: Arc<Inner>,
}

impl Lessons {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    // =========================================================================
    // Creation and reads
    // =========================================================================

    /// Create a lesson from a quote.
    ///
    /// Lessons are born with their first status record (REQUESTED); the
    /// owner row and the record become visible atomically.
    pub fn create(&self, quote_id: Option<Uuid>, metadata: Option<JsonValue>) -> Result<OwnerId> {
        Ok(self.inner.service.create_with_initial(
            quote_id,
            metadata,
            LessonStatus::Requested,
            None,
        )?)
    }

    /// Get a lesson with its full status history.
    pub fn get(&self, id: &OwnerId) -> Result<Option<Lesson>> {
        match self.inner.store.fetch_owner(*id)? {
            Some(snapshot) => Ok(Some(EntityMapper::to_domain::<LessonStatus>(&snapshot)?)),
            None => Ok(None),
        }
    }

    /// Full status history, oldest first.
    pub fn history(&self, id: &OwnerId) -> Result<Vec<StatusEntry<LessonStatus>>> {
        let snapshot = self.inner.service.load(*id)?;
        let lesson = EntityMapper::to_domain::<LessonStatus>(&snapshot)?;
        Ok(lesson.history)
    }

    /// List lessons, newest first, optionally filtered by current status.
    pub fn list(&self, status: Option<LessonStatus>, limit: Option<usize>) -> Result<Vec<Lesson>> {
        let snapshots = self.inner.store.list_owners(
            EntityKind::Lesson,
            status.map(|s| s.as_str()),
            limit,
        )?;
        snapshots
            .iter()
            .map(|s| EntityMapper::to_domain::<LessonStatus>(s).map_err(Into::into))
            .collect()
    }

    /// Check if a lesson exists.
    pub fn exists(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.exists(*id)?)
    }

    /// Delete a lesson, cascading to its status history.
    pub fn delete(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.delete(*id)?)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Append a status with an explicit context payload.
    pub fn transition(
        &self,
        id: &OwnerId,
        status: LessonStatus,
        context: Option<JsonValue>,
    ) -> Result<StatusId> {
        let row = self.inner.service.transition(*id, status, context)?;
        Ok(row.id)
    }

    /// A teacher quoted the request.
    pub fn quote(&self, id: &OwnerId, context: Option<JsonValue>) -> Result<StatusId> {
        self.transition(id, LessonStatus::Quoted, context)
    }

    /// The quote was accepted; the lesson is booked.
    pub fn confirm(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, LessonStatus::Confirmed, None)
    }

    /// The lesson started.
    pub fn start(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, LessonStatus::InProgress, None)
    }

    /// The lesson finished normally.
    pub fn complete(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, LessonStatus::Completed, None)
    }

    /// Call the lesson off, with an optional reason kept in context.
    pub fn cancel(&self, id: &OwnerId, reason: Option<&str>) -> Result<StatusId> {
        let context = reason.map(|r| json!({ "reason": r }));
        self.transition(id, LessonStatus::Cancelled, context)
    }

    /// The request or quote lapsed without confirmation.
    pub fn expire(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, LessonStatus::Expired, None)
    }
}
