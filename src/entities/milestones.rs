//! Milestone lifecycle operations.

use crate::error::Result;
use crate::tracker::Inner;
use lessonlog_api::{EntityMapper, Milestone, StatusEntry};
use lessonlog_core::status::{MilestoneStatus, StatusKind};
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_storage::StatusStore;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;

/// Milestone lifecycle operations.
///
/// Access via `db.milestones`. Milestones are created bare; `schedule`
/// records the first status (PLANNED).
pub struct Milestones {
    inner: Arc<Inner>,
}

impl Milestones {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Create a milestone under a lesson plan, with no status yet.
    pub fn create(&self, plan_id: Option<Uuid>, metadata: Option<JsonValue>) -> Result<OwnerId> {
        Ok(self.inner.service.create_bare::<MilestoneStatus>(plan_id, metadata)?)
    }

    /// Get a milestone with its full status history.
    ///
    /// `current` is `None` until the milestone is scheduled.
    pub fn get(&self, id: &OwnerId) -> Result<Option<Milestone>> {
        match self.inner.store.fetch_owner(*id)? {
            Some(snapshot) => Ok(Some(EntityMapper::to_domain::<MilestoneStatus>(&snapshot)?)),
            None => Ok(None),
        }
    }

    /// Full status history, oldest first.
    pub fn history(&self, id: &OwnerId) -> Result<Vec<StatusEntry<MilestoneStatus>>> {
        let snapshot = self.inner.service.load(*id)?;
        let milestone = EntityMapper::to_domain::<MilestoneStatus>(&snapshot)?;
        Ok(milestone.history)
    }

    /// List milestones, newest first, optionally filtered by current status.
    pub fn list(
        &self,
        status: Option<MilestoneStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<Milestone>> {
        let snapshots = self.inner.store.list_owners(
            EntityKind::Milestone,
            status.map(|s| s.as_str()),
            limit,
        )?;
        snapshots
            .iter()
            .map(|s| EntityMapper::to_domain::<MilestoneStatus>(s).map_err(Into::into))
            .collect()
    }

    /// Check if a milestone exists.
    pub fn exists(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.exists(*id)?)
    }

    /// Delete a milestone, cascading to its status history.
    pub fn delete(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.delete(*id)?)
    }

    /// Append a status with an explicit context payload.
    pub fn transition(
        &self,
        id: &OwnerId,
        status: MilestoneStatus,
        context: Option<JsonValue>,
    ) -> Result<StatusId> {
        let row = self.inner.service.transition(*id, status, context)?;
        Ok(row.id)
    }

    /// Schedule the milestone into the plan (first status, PLANNED).
    pub fn schedule(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, MilestoneStatus::Planned, None)
    }

    /// Work toward the milestone started.
    pub fn start(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, MilestoneStatus::InProgress, None)
    }

    /// The milestone was reached.
    pub fn achieve(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, MilestoneStatus::Achieved, None)
    }

    /// Pass over the milestone deliberately.
    pub fn skip(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, MilestoneStatus::Skipped, None)
    }
}
