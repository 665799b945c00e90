//! The main entry point: [`LessonLog`] and its builder.

use crate::entities::{Goals, Lessons, Milestones, Plans};
use crate::error::Result;
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_lifecycle::{DivergencePolicy, LifecycleService};
use lessonlog_storage::{MemoryStore, StatusStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Shared state behind every facade handle.
pub(crate) struct Inner {
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) service: LifecycleService,
}

/// Embedded status-lifecycle engine for a tutoring marketplace.
///
/// `LessonLog` tracks the lifecycle of Lessons, LessonPlans, Milestones,
/// and Goals: an append-only status history per entity, a validated
/// transition graph per kind, and a current-status pointer kept
/// consistent with the history.
///
/// # Example
///
/// ```
/// use lessonlog::prelude::*;
///
/// let db = LessonLog::open();
///
/// let lesson = db.lessons.create(None, None)?;
/// db.lessons.confirm(&lesson)?;
///
/// let entity = db.lessons.get(&lesson)?.expect("just created");
/// assert_eq!(entity.status(), Some(LessonStatus::Confirmed));
/// # Ok::<(), lessonlog::Error>(())
/// ```
pub struct LessonLog {
    /// Lesson lifecycle operations
    pub lessons: Lessons,
    /// LessonPlan lifecycle operations
    pub plans: Plans,
    /// Milestone lifecycle operations
    pub milestones: Milestones,
    /// Goal lifecycle operations
    pub goals: Goals,
    inner: Arc<Inner>,
}

impl LessonLog {
    /// Open an engine with default configuration.
    pub fn open() -> Self {
        Self::builder().build()
    }

    /// Start configuring an engine.
    pub fn builder() -> LessonLogBuilder {
        LessonLogBuilder::new()
    }

    /// Append a new status from the raw request payload form.
    ///
    /// This is the inbound external-request surface: an authenticated
    /// caller hands `{entity_kind, owner_id, requested_status, context}`
    /// and the engine validates, persists, and re-points atomically.
    /// Returns the id of the appended status record.
    pub fn transition(
        &self,
        kind: EntityKind,
        owner_id: OwnerId,
        requested: &str,
        context: Option<JsonValue>,
    ) -> Result<StatusId> {
        let row = self
            .inner
            .service
            .transition_raw(kind, owner_id, requested, context)?;
        Ok(row.id)
    }

    /// Total committed transitions since the engine was opened.
    pub fn commit_count(&self) -> u64 {
        self.inner.store.commit_count()
    }
}

/// Builder for [`LessonLog`].
///
/// # Example
///
/// ```
/// use lessonlog::prelude::*;
///
/// let db = LessonLog::builder()
///     .divergence_policy(DivergencePolicy::Flag)
///     .build();
/// # let _ = db;
/// ```
pub struct LessonLogBuilder {
    policy: DivergencePolicy,
}

impl LessonLogBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            policy: DivergencePolicy::default(),
        }
    }

    /// What the write path does when it finds an owner's pointer out of
    /// step with its history: repair it from the history (default) or
    /// fail the write so an operator can look.
    pub fn divergence_policy(mut self, policy: DivergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the engine.
    pub fn build(self) -> LessonLog {
        let store = Arc::new(MemoryStore::new());
        let service =
            LifecycleService::with_policy(store.clone() as Arc<dyn StatusStore>, self.policy);
        let inner = Arc::new(Inner { store, service });
        LessonLog {
            lessons: Lessons::new(inner.clone()),
            plans: Plans::new(inner.clone()),
            milestones: Milestones::new(inner.clone()),
            goals: Goals::new(inner.clone()),
            inner,
        }
    }
}

impl Default for LessonLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
