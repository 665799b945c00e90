//! In-memory reference store
//!
//! DashMap sharded by owner, FxHashMap record index within each shard.
//! The DashMap entry guard is the serializable scope: every commit for
//! an owner runs under exclusive access to that owner's shard, so the
//! record insert, the pointer update, and the version bump land
//! together or not at all. Different owners never contend.

use crate::rows::{OwnerRow, OwnerSnapshot, StatusRow};
use crate::store::StatusStore;
use dashmap::DashMap;
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_core::{LifecycleError, Result};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-owner shard: the owner row plus its record collection
#[derive(Debug)]
struct OwnerShard {
    owner: OwnerRow,
    records: Vec<StatusRow>,
    by_id: FxHashMap<StatusId, usize>,
}

impl OwnerShard {
    fn new(owner: OwnerRow) -> Self {
        Self {
            owner,
            records: Vec::new(),
            by_id: FxHashMap::default(),
        }
    }

    fn push(&mut self, record: StatusRow) {
        self.by_id.insert(record.id, self.records.len());
        self.records.push(record);
    }

    fn snapshot(&self) -> OwnerSnapshot {
        let current = self
            .owner
            .current_status_id
            .and_then(|id| self.by_id.get(&id))
            .map(|&idx| self.records[idx].clone());
        OwnerSnapshot {
            owner: self.owner.clone(),
            history: self.records.clone(),
            current,
        }
    }
}

/// In-memory store sharded by owner
///
/// # Thread Safety
///
/// All operations are thread-safe. Reads take the owner's shard guard
/// briefly to clone a consistent snapshot; commits hold it across the
/// whole version-check + insert + re-point sequence.
pub struct MemoryStore {
    shards: DashMap<OwnerId, OwnerShard>,
    /// Total committed transitions, across all owners. Cheap
    /// observability for tests and callers; not a CAS token.
    commits: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            shards: DashMap::new(),
            commits: AtomicU64::new(0),
        }
    }

    /// Total committed transitions since creation
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Acquire)
    }

    /// Number of owners
    pub fn owner_count(&self) -> usize {
        self.shards.len()
    }

    // ========================================================================
    // Out-of-band writes (recovery tooling and tests)
    // ========================================================================

    /// Append a record without touching the pointer or version.
    ///
    /// This is the partial-write shape a crashed or timed-out commit
    /// would leave behind in a store without an atomic scope. Exists so
    /// recovery tooling and tests can fabricate that state; the service
    /// never calls it.
    pub fn insert_record_unchecked(&self, record: StatusRow) -> Result<()> {
        let mut shard = self
            .shards
            .get_mut(&record.owner_id)
            .ok_or(LifecycleError::NotFound(record.owner_id))?;
        shard.push(record);
        Ok(())
    }

    /// Null the owner's pointer without touching history or version.
    pub fn clear_current_unchecked(&self, owner_id: OwnerId) -> Result<()> {
        let mut shard = self
            .shards
            .get_mut(&owner_id)
            .ok_or(LifecycleError::NotFound(owner_id))?;
        shard.owner.current_status_id = None;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusStore for MemoryStore {
    fn create_owner(&self, owner: OwnerRow, initial: Option<StatusRow>) -> Result<()> {
        use dashmap::mapref::entry::Entry;

        if let Some(record) = &initial {
            if record.owner_id != owner.id {
                return Err(LifecycleError::Internal(format!(
                    "initial record for {} attached to owner {}",
                    record.owner_id, owner.id
                )));
            }
            if record.kind != owner.kind {
                return Err(LifecycleError::Internal(format!(
                    "initial {} record attached to {} owner",
                    record.kind, owner.kind
                )));
            }
        }

        match self.shards.entry(owner.id) {
            Entry::Occupied(_) => Err(LifecycleError::Conflict(owner.id)),
            Entry::Vacant(slot) => {
                let mut shard = OwnerShard::new(owner);
                if let Some(record) = initial {
                    shard.owner.current_status_id = Some(record.id);
                    shard.owner.version = 1;
                    shard.push(record);
                    self.commits.fetch_add(1, Ordering::AcqRel);
                }
                slot.insert(shard);
                Ok(())
            }
        }
    }

    fn fetch_owner(&self, id: OwnerId) -> Result<Option<OwnerSnapshot>> {
        Ok(self.shards.get(&id).map(|shard| shard.snapshot()))
    }

    fn commit_transition(
        &self,
        owner_id: OwnerId,
        expected_version: u64,
        record: StatusRow,
    ) -> Result<u64> {
        let mut shard = self
            .shards
            .get_mut(&owner_id)
            .ok_or(LifecycleError::NotFound(owner_id))?;

        if record.owner_id != owner_id {
            return Err(LifecycleError::Internal(format!(
                "record for {} committed to owner {}",
                record.owner_id, owner_id
            )));
        }
        if record.kind != shard.owner.kind {
            return Err(LifecycleError::Internal(format!(
                "{} record committed to {} owner {}",
                record.kind, shard.owner.kind, owner_id
            )));
        }

        if shard.owner.version != expected_version {
            return Err(LifecycleError::ConcurrentTransition {
                owner: owner_id,
                expected: expected_version,
                actual: shard.owner.version,
            });
        }

        if let Some(last) = shard.records.last() {
            if record.created_at < last.created_at {
                let err = LifecycleError::Ordering {
                    prev: last.created_at,
                    next: record.created_at,
                };
                tracing::error!(
                    owner = %owner_id,
                    prev = %last.created_at,
                    next = %record.created_at,
                    "timestamp regression rejected at commit"
                );
                return Err(err);
            }
        }

        let record_id = record.id;
        shard.push(record);
        shard.owner.current_status_id = Some(record_id);
        shard.owner.version += 1;
        self.commits.fetch_add(1, Ordering::AcqRel);
        Ok(shard.owner.version)
    }

    fn repoint_current(
        &self,
        owner_id: OwnerId,
        expected_version: u64,
        status_id: StatusId,
    ) -> Result<u64> {
        let mut shard = self
            .shards
            .get_mut(&owner_id)
            .ok_or(LifecycleError::NotFound(owner_id))?;

        if shard.owner.version != expected_version {
            return Err(LifecycleError::ConcurrentTransition {
                owner: owner_id,
                expected: expected_version,
                actual: shard.owner.version,
            });
        }
        if !shard.by_id.contains_key(&status_id) {
            return Err(LifecycleError::Internal(format!(
                "repoint target {} is not in the history of {}",
                status_id, owner_id
            )));
        }

        shard.owner.current_status_id = Some(status_id);
        shard.owner.version += 1;
        Ok(shard.owner.version)
    }

    fn delete_owner(&self, id: OwnerId) -> Result<bool> {
        // Cascade: the shard owns the full history, so removing it
        // removes every record with it.
        Ok(self.shards.remove(&id).is_some())
    }

    fn owner_exists(&self, id: OwnerId) -> Result<bool> {
        Ok(self.shards.contains_key(&id))
    }

    fn list_owners(
        &self,
        kind: EntityKind,
        status: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<OwnerSnapshot>> {
        let mut matched: Vec<OwnerSnapshot> = self
            .shards
            .iter()
            .filter(|entry| entry.owner.kind == kind)
            .map(|entry| entry.snapshot())
            .filter(|snapshot| match status {
                Some(wanted) => snapshot
                    .current
                    .as_ref()
                    .is_some_and(|current| current.status == wanted),
                None => true,
            })
            .collect();

        matched.sort_by(|a, b| b.owner.created_at.cmp(&a.owner.created_at));
        if let Some(cap) = limit {
            matched.truncate(cap);
        }
        Ok(matched)
    }
}
