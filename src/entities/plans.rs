//! LessonPlan lifecycle operations.

use crate::error::Result;
use crate::tracker::Inner;
use lessonlog_api::{EntityMapper, LessonPlan, StatusEntry};
use lessonlog_core::status::{PlanStatus, StatusKind};
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_storage::StatusStore;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;

/// LessonPlan lifecycle operations.
///
/// Access via `db.plans`. Plans are born DRAFT and cycle between ACTIVE
/// and PAUSED until COMPLETED or ABANDONED.
pub struct Plans {
    inner: Arc<Inner>,
}

impl Plans {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Create a plan for a lesson, born with its DRAFT record.
    pub fn create(&self, lesson_id: Option<Uuid>, metadata: Option<JsonValue>) -> Result<OwnerId> {
        Ok(self
            .inner
            .service
            .create_with_initial(lesson_id, metadata, PlanStatus::Draft, None)?)
    }

    /// Get a plan with its full status history.
    pub fn get(&self, id: &OwnerId) -> Result<Option<LessonPlan>> {
        match self.inner.store.fetch_owner(*id)? {
            Some(snapshot) => Ok(Some(EntityMapper::to_domain::<PlanStatus>(&snapshot)?)),
            None => Ok(None),
        }
    }

    /// Full status history, oldest first.
    pub fn history(&self, id: &OwnerId) -> Result<Vec<StatusEntry<PlanStatus>>> {
        let snapshot = self.inner.service.load(*id)?;
        let plan = EntityMapper::to_domain::<PlanStatus>(&snapshot)?;
        Ok(plan.history)
    }

    /// List plans, newest first, optionally filtered by current status.
    pub fn list(&self, status: Option<PlanStatus>, limit: Option<usize>) -> Result<Vec<LessonPlan>> {
        let snapshots = self.inner.store.list_owners(
            EntityKind::LessonPlan,
            status.map(|s| s.as_str()),
            limit,
        )?;
        snapshots
            .iter()
            .map(|s| EntityMapper::to_domain::<PlanStatus>(s).map_err(Into::into))
            .collect()
    }

    /// Check if a plan exists.
    pub fn exists(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.exists(*id)?)
    }

    /// Delete a plan, cascading to its status history.
    pub fn delete(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.delete(*id)?)
    }

    /// Append a status with an explicit context payload.
    pub fn transition(
        &self,
        id: &OwnerId,
        status: PlanStatus,
        context: Option<JsonValue>,
    ) -> Result<StatusId> {
        let row = self.inner.service.transition(*id, status, context)?;
        Ok(row.id)
    }

    /// Put the plan into use.
    pub fn activate(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, PlanStatus::Active, None)
    }

    /// Put the plan on hold.
    pub fn pause(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, PlanStatus::Paused, None)
    }

    /// Resume a paused plan.
    pub fn resume(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, PlanStatus::Active, None)
    }

    /// All planned work done.
    pub fn complete(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, PlanStatus::Completed, None)
    }

    /// Give the plan up.
    pub fn abandon(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, PlanStatus::Abandoned, None)
    }
}
