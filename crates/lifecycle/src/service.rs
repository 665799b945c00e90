//! Transition orchestration
//!
//! [`LifecycleService`] is the only writer of status records and the
//! only mutator of the current-status pointer. Everything else in the
//! workspace only reads.
//!
//! ## Commit Sequence
//!
//! ```text
//! 1. owner_lock(owner)            - serialize same-owner writers
//! 2. load snapshot                - owner row + history + current
//! 3. repair or flag divergence    - per DivergencePolicy
//! 4. validate_or_fail             - against the kind's legal table
//! 5. build record                 - server-assigned timestamp
//! 6. commit_transition            - atomic insert + re-point, CAS on
//!                                   the owner version
//! 7. return the new record
//! ```
//!
//! The store makes steps 5–6 atomic per owner, so a crash can never land
//! a record without its pointer update. The CAS makes the version check
//! and the apply one step; the per-owner lock exists so plain callers do
//! not burn CAS failures under contention, not for correctness.
//!
//! [`LifecycleService::transition_with_baseline`] skips the lock and the
//! reload: the caller owns the baseline snapshot, and the losing side of
//! a race gets `ConcurrentTransition`. The core never retries; callers
//! retry with fresh current-status context if they want to.

use dashmap::DashMap;
use lessonlog_core::record::StatusRecord;
use lessonlog_core::status::{GoalStatus, LessonStatus, MilestoneStatus, PlanStatus, StatusKind};
use lessonlog_core::transitions::TransitionValidator;
use lessonlog_core::types::{EntityKind, OwnerId};
use lessonlog_core::{LifecycleError, Result};
use lessonlog_storage::{OwnerRow, OwnerSnapshot, PointerCheck, StatusRow, StatusStore};
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use uuid::Uuid;

/// What to do when a write-path load finds the pointer out of step with
/// the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivergencePolicy {
    /// Re-point the row at history's latest record before validating.
    /// History is authoritative; the pointer is an optimization.
    #[default]
    Repair,
    /// Fail the write with a `Mapping` error so an operator can look.
    Flag,
}

/// Orchestrates status transitions for all four entity kinds
pub struct LifecycleService {
    store: Arc<dyn StatusStore>,
    policy: DivergencePolicy,
    /// Per-owner commit locks. Grows with distinct owners; entries are
    /// a single Arc and are dropped when the owner is deleted.
    owner_locks: DashMap<OwnerId, Arc<Mutex<()>>>,
}

impl LifecycleService {
    /// Create a service with the default `Repair` divergence policy
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self::with_policy(store, DivergencePolicy::default())
    }

    /// Create a service with an explicit divergence policy
    pub fn with_policy(store: Arc<dyn StatusStore>, policy: DivergencePolicy) -> Self {
        Self {
            store,
            policy,
            owner_locks: DashMap::new(),
        }
    }

    /// The configured divergence policy
    pub fn policy(&self) -> DivergencePolicy {
        self.policy
    }

    // ========================================================================
    // Owner creation
    // ========================================================================

    /// Create an owner together with its first status record.
    ///
    /// The initial status is validated against the kind's valid first
    /// statuses; owner row and record become visible atomically.
    pub fn create_with_initial<S: StatusKind>(
        &self,
        parent_id: Option<Uuid>,
        metadata: Option<JsonValue>,
        status: S,
        context: Option<JsonValue>,
    ) -> Result<OwnerId> {
        TransitionValidator::validate_or_fail(None, status)?;
        let owner = OwnerRow::new(OwnerId::new(), S::KIND, parent_id, metadata);
        let id = owner.id;
        let record = StatusRecord::new(id, status, context);
        self.store
            .create_owner(owner, Some(StatusRow::from_record(&record)))?;
        tracing::debug!(owner = %id, kind = %S::KIND, status = %status.as_str(), "owner created");
        Ok(id)
    }

    /// Create a bare owner (empty history).
    ///
    /// Only legal for kinds that are not born with their first record;
    /// their first `transition` is validated against the initial set.
    pub fn create_bare<S: StatusKind>(
        &self,
        parent_id: Option<Uuid>,
        metadata: Option<JsonValue>,
    ) -> Result<OwnerId> {
        if S::INITIAL_RECORD_REQUIRED {
            return Err(LifecycleError::validation(format!(
                "{} entities are created with their first status record",
                S::KIND
            )));
        }
        let owner = OwnerRow::new(OwnerId::new(), S::KIND, parent_id, metadata);
        let id = owner.id;
        self.store.create_owner(owner, None)?;
        tracing::debug!(owner = %id, kind = %S::KIND, "owner created bare");
        Ok(id)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Append a new status to an owner.
    ///
    /// Serializes same-owner writers, loads a fresh snapshot, applies
    /// the divergence policy, validates, and commits atomically.
    pub fn transition<S: StatusKind>(
        &self,
        owner_id: OwnerId,
        requested: S,
        context: Option<JsonValue>,
    ) -> Result<StatusRow> {
        let lock = self.owner_lock(owner_id);
        let _guard = lock.lock();
        let snapshot = self.load_for_write(owner_id)?;
        self.commit(&snapshot, requested, context)
    }

    /// Append a new status against a caller-held baseline.
    ///
    /// No lock, no reload: the commit CASes on the baseline's owner
    /// version. If another writer committed since the baseline was
    /// taken, this fails with `ConcurrentTransition` and persists
    /// nothing.
    pub fn transition_with_baseline<S: StatusKind>(
        &self,
        baseline: &OwnerSnapshot,
        requested: S,
        context: Option<JsonValue>,
    ) -> Result<StatusRow> {
        self.commit(baseline, requested, context)
    }

    /// Append a new status given the raw request payload form.
    ///
    /// Parses `requested` against the kind's enumeration (`Validation`
    /// on an unknown member) and dispatches to the typed path.
    pub fn transition_raw(
        &self,
        kind: EntityKind,
        owner_id: OwnerId,
        requested: &str,
        context: Option<JsonValue>,
    ) -> Result<StatusRow> {
        match kind {
            EntityKind::Lesson => self.transition_parsed::<LessonStatus>(owner_id, requested, context),
            EntityKind::LessonPlan => self.transition_parsed::<PlanStatus>(owner_id, requested, context),
            EntityKind::Milestone => {
                self.transition_parsed::<MilestoneStatus>(owner_id, requested, context)
            }
            EntityKind::Goal => self.transition_parsed::<GoalStatus>(owner_id, requested, context),
        }
    }

    fn transition_parsed<S: StatusKind>(
        &self,
        owner_id: OwnerId,
        raw: &str,
        context: Option<JsonValue>,
    ) -> Result<StatusRow> {
        let requested = S::parse(raw).ok_or_else(|| {
            LifecycleError::validation(format!("'{}' is not a {} status", raw, S::KIND))
        })?;
        self.transition(owner_id, requested, context)
    }

    // ========================================================================
    // Reads and removal
    // ========================================================================

    /// Load an owner snapshot, failing with `NotFound` if absent
    pub fn load(&self, owner_id: OwnerId) -> Result<OwnerSnapshot> {
        self.store
            .fetch_owner(owner_id)?
            .ok_or(LifecycleError::NotFound(owner_id))
    }

    /// Whether an owner exists
    pub fn exists(&self, owner_id: OwnerId) -> Result<bool> {
        self.store.owner_exists(owner_id)
    }

    /// Delete an owner, cascading to its history
    pub fn delete(&self, owner_id: OwnerId) -> Result<bool> {
        let removed = self.store.delete_owner(owner_id)?;
        self.owner_locks.remove(&owner_id);
        Ok(removed)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn owner_lock(&self, owner_id: OwnerId) -> Arc<Mutex<()>> {
        self.owner_locks
            .entry(owner_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load a snapshot for writing, repairing or flagging pointer
    /// divergence per policy.
    fn load_for_write(&self, owner_id: OwnerId) -> Result<OwnerSnapshot> {
        let mut snapshot = self.load(owner_id)?;
        let state = snapshot.check_pointer();
        if state == PointerCheck::Consistent {
            return Ok(snapshot);
        }

        match self.policy {
            DivergencePolicy::Repair => {
                let latest_id = snapshot
                    .latest()
                    .ok_or_else(|| {
                        // Dangling pointer over an empty history: there is
                        // nothing to re-point at, so this cannot self-heal.
                        LifecycleError::mapping(
                            owner_id,
                            "current-status pointer set but history is empty",
                        )
                    })?
                    .id;
                let version =
                    self.store
                        .repoint_current(owner_id, snapshot.owner.version, latest_id)?;
                tracing::warn!(
                    owner = %owner_id,
                    ?state,
                    repaired_to = %latest_id,
                    "current-status pointer repaired from history"
                );
                snapshot.owner.version = version;
                snapshot.owner.current_status_id = Some(latest_id);
                snapshot.current = snapshot.history.last().cloned();
                Ok(snapshot)
            }
            DivergencePolicy::Flag => Err(LifecycleError::mapping(
                owner_id,
                format!("pointer/history divergence detected ({:?})", state),
            )),
        }
    }

    /// Validate against the snapshot and commit atomically.
    ///
    /// The current status for validation is history's latest record,
    /// parsed strictly: the write path refuses to act on a stored status
    /// it cannot interpret (the read-path fallback never applies here).
    fn commit<S: StatusKind>(
        &self,
        snapshot: &OwnerSnapshot,
        requested: S,
        context: Option<JsonValue>,
    ) -> Result<StatusRow> {
        if snapshot.owner.kind != S::KIND {
            return Err(LifecycleError::validation(format!(
                "owner {} is a {}, not a {}",
                snapshot.owner.id, snapshot.owner.kind, S::KIND
            )));
        }

        let current: Option<S> = match snapshot.latest() {
            Some(row) => Some(S::parse(&row.status).ok_or_else(|| {
                LifecycleError::validation(format!(
                    "stored status '{}' of {} cannot be interpreted; write refused",
                    row.status, snapshot.owner.id
                ))
            })?),
            None => None,
        };

        TransitionValidator::validate_or_fail(current, requested)?;

        let record = StatusRecord::new(snapshot.owner.id, requested, context);
        let row = StatusRow::from_record(&record);
        let version =
            self.store
                .commit_transition(snapshot.owner.id, snapshot.owner.version, row.clone())?;

        tracing::debug!(
            owner = %snapshot.owner.id,
            kind = %S::KIND,
            from = current.map(|s| s.as_str()).unwrap_or("<none>"),
            to = %requested.as_str(),
            version,
            "transition committed"
        );
        Ok(row)
    }
}
