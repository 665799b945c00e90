//! Goal lifecycle operations.

use crate::error::Result;
use crate::tracker::Inner;
use lessonlog_api::{EntityMapper, Goal, StatusEntry};
use lessonlog_core::status::{GoalStatus, StatusKind};
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_storage::StatusStore;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;

/// Goal lifecycle operations.
///
/// Access via `db.goals`. Goals are created bare, PROPOSED first, then
/// AGREED (possibly re-agreed with revised context, the one permitted
/// same-status transition), until ACHIEVED or DROPPED.
pub struct Goals {
    inner: Arc<Inner>,
}

impl Goals {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    /// Create a goal attached to a lesson, with no status yet.
    pub fn create(&self, lesson_id: Option<Uuid>, metadata: Option<JsonValue>) -> Result<OwnerId> {
        Ok(self.inner.service.create_bare::<GoalStatus>(lesson_id, metadata)?)
    }

    /// Get a goal with its full status history.
    pub fn get(&self, id: &OwnerId) -> Result<Option<Goal>> {
        match self.inner.store.fetch_owner(*id)? {
            Some(snapshot) => Ok(Some(EntityMapper::to_domain::<GoalStatus>(&snapshot)?)),
            None => Ok(None),
        }
    }

    /// Full status history, oldest first.
    pub fn history(&self, id: &OwnerId) -> Result<Vec<StatusEntry<GoalStatus>>> {
        let snapshot = self.inner.service.load(*id)?;
        let goal = EntityMapper::to_domain::<GoalStatus>(&snapshot)?;
        Ok(goal.history)
    }

    /// List goals, newest first, optionally filtered by current status.
    pub fn list(&self, status: Option<GoalStatus>, limit: Option<usize>) -> Result<Vec<Goal>> {
        let snapshots =
            self.inner
                .store
                .list_owners(EntityKind::Goal, status.map(|s| s.as_str()), limit)?;
        snapshots
            .iter()
            .map(|s| EntityMapper::to_domain::<GoalStatus>(s).map_err(Into::into))
            .collect()
    }

    /// Check if a goal exists.
    pub fn exists(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.exists(*id)?)
    }

    /// Delete a goal, cascading to its status history.
    pub fn delete(&self, id: &OwnerId) -> Result<bool> {
        Ok(self.inner.service.delete(*id)?)
    }

    /// Append a status with an explicit context payload.
    pub fn transition(
        &self,
        id: &OwnerId,
        status: GoalStatus,
        context: Option<JsonValue>,
    ) -> Result<StatusId> {
        let row = self.inner.service.transition(*id, status, context)?;
        Ok(row.id)
    }

    /// Record the proposal (first status).
    pub fn propose(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, GoalStatus::Proposed, None)
    }

    /// Both parties committed to the goal.
    ///
    /// Legal from PROPOSED and from AGREED itself: re-agreeing with
    /// revised context is the one whitelisted same-status transition.
    pub fn agree(&self, id: &OwnerId, context: Option<JsonValue>) -> Result<StatusId> {
        self.transition(id, GoalStatus::Agreed, context)
    }

    /// The goal was met.
    pub fn achieve(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, GoalStatus::Achieved, None)
    }

    /// Stop pursuing the goal (DROPPED).
    pub fn discard(&self, id: &OwnerId) -> Result<StatusId> {
        self.transition(id, GoalStatus::Dropped, None)
    }
}
