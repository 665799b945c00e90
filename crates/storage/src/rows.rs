//! Persisted row representations
//!
//! Rows are the persistence form of status facts and owner entities.
//! Statuses are stored as raw strings: the store never interprets them,
//! and read paths must survive historical strings that no longer parse
//! (the mapper handles that; see the api crate).

use lessonlog_core::record::StatusRecord;
use lessonlog_core::status::StatusKind;
use lessonlog_core::types::{EntityKind, OwnerId, StatusId, Timestamp};
use lessonlog_core::{LifecycleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Persisted form of one status record
///
/// Immutable once inserted; the store never updates or deletes a
/// StatusRow except when its owner is cascade-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRow {
    /// Record identifier
    pub id: StatusId,
    /// Owner back-reference
    pub owner_id: OwnerId,
    /// Owner's entity kind
    pub kind: EntityKind,
    /// Raw persisted status string (SCREAMING_SNAKE)
    pub status: String,
    /// Opaque context payload
    pub context: Option<JsonValue>,
    /// When the fact was recorded
    pub created_at: Timestamp,
}

impl StatusRow {
    /// Persist a typed record
    pub fn from_record<S: StatusKind>(record: &StatusRecord<S>) -> Self {
        Self {
            id: record.id(),
            owner_id: record.owner_id(),
            kind: S::KIND,
            status: record.status().as_str().to_string(),
            context: record.context().cloned(),
            created_at: record.created_at(),
        }
    }

    /// Rehydrate a typed record, strictly.
    ///
    /// Fails with `Validation` if the stored string is not a member of
    /// `S`'s enumeration. Write paths use this; the lenient fallback
    /// path belongs to the read-side mapper only.
    pub fn to_record<S: StatusKind>(&self) -> Result<StatusRecord<S>> {
        let status = S::parse(&self.status).ok_or_else(|| {
            LifecycleError::validation(format!(
                "stored status '{}' is not a {} status",
                self.status,
                S::KIND
            ))
        })?;
        Ok(StatusRecord::from_parts(
            self.id,
            self.owner_id,
            status,
            self.context.clone(),
            self.created_at,
        ))
    }
}

/// Persisted form of an owning entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerRow {
    /// Entity identifier
    pub id: OwnerId,
    /// Entity kind
    pub kind: EntityKind,
    /// Parent entity, kind-dependent: Lesson → quote, LessonPlan →
    /// lesson, Milestone → lesson plan, Goal → lesson
    pub parent_id: Option<Uuid>,
    /// Opaque owner metadata
    pub metadata: Option<JsonValue>,
    /// Pointer to the current status record, if any.
    ///
    /// Invariant: when non-null it references a StatusRow whose
    /// `owner_id` equals this row's `id`, and that row is the most
    /// recent in the history. The pointer is an optimization over
    /// "latest by time"; the history stays authoritative.
    pub current_status_id: Option<StatusId>,
    /// CAS token: bumped on every committed transition and repair.
    pub version: u64,
    /// When the entity was created
    pub created_at: Timestamp,
}

impl OwnerRow {
    /// Create a fresh owner row with no history and version 0
    pub fn new(
        id: OwnerId,
        kind: EntityKind,
        parent_id: Option<Uuid>,
        metadata: Option<JsonValue>,
    ) -> Self {
        Self {
            id,
            kind,
            parent_id,
            metadata,
            current_status_id: None,
            version: 0,
            created_at: Timestamp::now(),
        }
    }
}

/// An owner row fetched together with its full status collection and the
/// record its pointer resolves to
///
/// This is the unit the store hands to readers and the service: one
/// consistent view of the owner taken under its shard guard.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSnapshot {
    /// The owner row
    pub owner: OwnerRow,
    /// Full status history in append order
    pub history: Vec<StatusRow>,
    /// The record `owner.current_status_id` resolves to, if any
    pub current: Option<StatusRow>,
}

/// Outcome of checking an owner's pointer against its history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCheck {
    /// Pointer and history agree (or both are empty)
    Consistent,
    /// Pointer resolves to a record that is not the latest
    Diverged,
    /// History is non-empty but the pointer is null
    Missing,
    /// Pointer is set but resolves to no record in the history
    Dangling,
}

impl OwnerSnapshot {
    /// The most recent record by history position.
    ///
    /// Append order is authoritative: timestamps are non-decreasing, so
    /// the last row is the latest.
    pub fn latest(&self) -> Option<&StatusRow> {
        self.history.last()
    }

    /// Classify the pointer/history relationship.
    ///
    /// Read paths surface `Diverged` as a warning and reject `Missing` /
    /// `Dangling`; the write path repairs or flags all three per the
    /// configured divergence policy.
    pub fn check_pointer(&self) -> PointerCheck {
        match (self.owner.current_status_id, &self.current, self.latest()) {
            (None, _, None) => PointerCheck::Consistent,
            (None, _, Some(_)) => PointerCheck::Missing,
            (Some(_), None, _) => PointerCheck::Dangling,
            (Some(_), Some(current), Some(latest)) => {
                if current.id == latest.id {
                    PointerCheck::Consistent
                } else {
                    PointerCheck::Diverged
                }
            }
            // Pointer resolved but history empty: the record is not in
            // the collection, so the pointer dangles.
            (Some(_), Some(_), None) => PointerCheck::Dangling,
        }
    }

    /// Whether the pointer resolves to a record that is not the latest
    pub fn is_diverged(&self) -> bool {
        self.check_pointer() == PointerCheck::Diverged
    }
}
