//! Status records and the append-only history
//!
//! A [`StatusRecord`] is one immutable, timestamped fact: "entity X had
//! status S with optional context C at time T". A [`StatusHistory`] is
//! the append-only ordered sequence of those facts for one owner.
//!
//! ## Design
//!
//! - Records are never updated or deleted; fields are private and only
//!   readable through accessors.
//! - History timestamps are monotonically non-decreasing. Equal
//!   timestamps are legal (bursts within one millisecond) and keep
//!   insertion order.
//! - The current status is a derived view: always the last record. A
//!   persisted current-status pointer elsewhere is an optimization, not
//!   a second source of truth.

use crate::error::{LifecycleError, Result};
use crate::status::StatusKind;
use crate::types::{OwnerId, StatusId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One immutable status fact about an owner
///
/// Construction is the only behavior beyond equality. The context
/// payload is opaque structured data the core never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: StatusKind")]
pub struct StatusRecord<S: StatusKind> {
    id: StatusId,
    owner_id: OwnerId,
    status: S,
    context: Option<JsonValue>,
    created_at: Timestamp,
}

impl<S: StatusKind> StatusRecord<S> {
    /// Create a record stamped with the server clock.
    ///
    /// This is the write-path constructor: the timestamp is assigned
    /// internally, so caller-supplied clock skew cannot enter a history
    /// through it.
    pub fn new(owner_id: OwnerId, status: S, context: Option<JsonValue>) -> Self {
        Self {
            id: StatusId::new(),
            owner_id,
            status,
            context,
            created_at: Timestamp::now(),
        }
    }

    /// Create a record from untrusted parts.
    ///
    /// Fails with `Validation` if the raw status string is not a member
    /// of the kind's enumeration, or if the timestamp is in the future
    /// relative to the server clock.
    pub fn from_untrusted(
        owner_id: OwnerId,
        raw_status: &str,
        context: Option<JsonValue>,
        created_at: Timestamp,
    ) -> Result<Self> {
        let status = S::parse(raw_status).ok_or_else(|| {
            LifecycleError::validation(format!(
                "'{}' is not a {} status",
                raw_status,
                S::KIND
            ))
        })?;
        if created_at.is_future() {
            return Err(LifecycleError::validation(format!(
                "timestamp {} is in the future",
                created_at
            )));
        }
        Ok(Self {
            id: StatusId::new(),
            owner_id,
            status,
            context,
            created_at,
        })
    }

    /// Rehydrate a record from trusted persisted parts.
    ///
    /// No clock validation: historical rows keep whatever timestamp they
    /// were persisted with.
    pub fn from_parts(
        id: StatusId,
        owner_id: OwnerId,
        status: S,
        context: Option<JsonValue>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            status,
            context,
            created_at,
        }
    }

    /// Record identifier
    pub fn id(&self) -> StatusId {
        self.id
    }

    /// The owner this fact is about
    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// The status held
    pub fn status(&self) -> S {
        self.status
    }

    /// Opaque context payload, if any
    pub fn context(&self) -> Option<&JsonValue> {
        self.context.as_ref()
    }

    /// When the fact was recorded
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Append-only ordered sequence of status records for one owner
///
/// Non-empty for any entity that has ever left its creation state. The
/// last record is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "S: StatusKind")]
pub struct StatusHistory<S: StatusKind> {
    records: Vec<StatusRecord<S>>,
}

impl<S: StatusKind> Default for StatusHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StatusKind> StatusHistory<S> {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Rehydrate a history from persisted records.
    ///
    /// Records must already be in append order; a timestamp regression
    /// fails with `Ordering`, and an owner mismatch with `Validation`.
    pub fn from_records(records: Vec<StatusRecord<S>>) -> Result<Self> {
        let mut history = Self::new();
        for record in records {
            history.append(record)?;
        }
        Ok(history)
    }

    /// Append a record; the history's current becomes `record`.
    ///
    /// Preconditions:
    /// - `record.created_at` >= the current record's timestamp
    ///   (`Ordering` otherwise)
    /// - `record.owner_id` matches the rest of the history
    ///   (`Validation` otherwise)
    pub fn append(&mut self, record: StatusRecord<S>) -> Result<&StatusRecord<S>> {
        if let Some(last) = self.records.last() {
            if record.owner_id != last.owner_id {
                return Err(LifecycleError::validation(format!(
                    "record for {} appended to history of {}",
                    record.owner_id, last.owner_id
                )));
            }
            if record.created_at < last.created_at {
                return Err(LifecycleError::Ordering {
                    prev: last.created_at,
                    next: record.created_at,
                });
            }
        }
        let idx = self.records.len();
        self.records.push(record);
        Ok(&self.records[idx])
    }

    /// The latest record, or `None` if the history is empty
    pub fn current(&self) -> Option<&StatusRecord<S>> {
        self.records.last()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only traversal in append order.
    ///
    /// The iterator is restartable and never mutates the history.
    pub fn iter(&self) -> std::slice::Iter<'_, StatusRecord<S>> {
        self.records.iter()
    }

    /// Records as a slice, append-ordered
    pub fn as_slice(&self) -> &[StatusRecord<S>] {
        &self.records
    }
}

impl<'a, S: StatusKind> IntoIterator for &'a StatusHistory<S> {
    type Item = &'a StatusRecord<S>;
    type IntoIter = std::slice::Iter<'a, StatusRecord<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
