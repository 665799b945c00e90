//! The store contract
//!
//! The lifecycle core requires a store capable of three things:
//! (a) inserting an immutable record, (b) atomically updating the
//! owner's current-status pointer, (c) fetching an owner row joined with
//! its full status collection and the record the pointer resolves to.
//!
//! `commit_transition` folds (a) and (b) into one serializable scope so
//! a crash can never land between them, and guards the whole commit with
//! a compare-and-swap on the owner's version.
//!
//! ## Error Handling
//!
//! | Condition | Error |
//! |-----------|-------|
//! | Owner id already exists | `Conflict` |
//! | Owner does not exist | `NotFound` |
//! | Version mismatch at commit | `ConcurrentTransition` |
//! | Timestamp regression at commit | `Ordering` |
//! | Record/owner kind or id mismatch | `Internal` |

use crate::rows::{OwnerRow, OwnerSnapshot, StatusRow};
use lessonlog_core::types::{EntityKind, OwnerId, StatusId};
use lessonlog_core::Result;

/// Persistence contract for owners and their status histories
///
/// Implementations must make `create_owner` and `commit_transition`
/// atomic per owner: concurrent commits against the same owner must be
/// serialized, and exactly one of two commits racing on the same version
/// may succeed.
pub trait StatusStore: Send + Sync {
    /// Create an owner, optionally together with its first status record.
    ///
    /// The owner and the initial record (pointer included) become
    /// visible in one step. Fails with `Conflict` if the id exists.
    fn create_owner(&self, owner: OwnerRow, initial: Option<StatusRow>) -> Result<()>;

    /// Fetch an owner with its full history and resolved current record.
    ///
    /// Returns one consistent view taken under the owner's guard, or
    /// `None` if the owner does not exist.
    fn fetch_owner(&self, id: OwnerId) -> Result<Option<OwnerSnapshot>>;

    /// Atomically append a record and re-point the owner to it.
    ///
    /// Compare-and-swap on `expected_version`: on mismatch nothing is
    /// persisted and `ConcurrentTransition` names the observed version.
    /// Returns the owner's new version.
    fn commit_transition(
        &self,
        owner_id: OwnerId,
        expected_version: u64,
        record: StatusRow,
    ) -> Result<u64>;

    /// Re-point the owner's current-status pointer at an existing record.
    ///
    /// Used by divergence repair. Same CAS discipline as
    /// `commit_transition`; inserts nothing. Returns the new version.
    fn repoint_current(
        &self,
        owner_id: OwnerId,
        expected_version: u64,
        status_id: StatusId,
    ) -> Result<u64>;

    /// Delete an owner and cascade to its entire status history.
    ///
    /// Returns whether the owner existed. Never leaves orphaned records.
    fn delete_owner(&self, id: OwnerId) -> Result<bool>;

    /// Whether an owner exists
    fn owner_exists(&self, id: OwnerId) -> Result<bool>;

    /// List owners of a kind, newest first.
    ///
    /// `status` filters on the raw current-status string; `limit` caps
    /// the result length.
    fn list_owners(
        &self,
        kind: EntityKind,
        status: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<OwnerSnapshot>>;
}
