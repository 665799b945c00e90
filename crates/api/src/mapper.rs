//! Persisted row → domain entity mapping
//!
//! One generic mapper over the kind descriptor. It enforces the
//! current-status invariant on the way out of storage and degrades
//! gracefully, never silently, on historical drift:
//!
//! - history non-empty with a null pointer, a dangling pointer, or a
//!   missing mandatory initial record: `Mapping` error. The read fails
//!   rather than returning a corrupted entity.
//! - pointer resolvable but stale: tolerated. The entity is surfaced
//!   with history's latest record as current, marked
//!   [`Integrity::Diverged`], and a warning is logged.
//! - stored status string no longer parses: the kind's documented
//!   fallback is substituted for that entry, with a warning. Write paths
//!   never use this fallback.
//!
//! The mapper is pure: it reads the snapshot it is given, performs no
//! store access, and mutates nothing.

use crate::domain::{Entity, Integrity, StatusEntry};
use lessonlog_core::record::{StatusHistory, StatusRecord};
use lessonlog_core::status::StatusKind;
use lessonlog_core::{LifecycleError, Result};
use lessonlog_storage::{OwnerSnapshot, PointerCheck, StatusRow};

/// Converts persisted owner snapshots into domain entities
pub struct EntityMapper;

impl EntityMapper {
    /// Map a snapshot to a domain entity of kind `S`.
    pub fn to_domain<S: StatusKind>(snapshot: &OwnerSnapshot) -> Result<Entity<S>> {
        let owner = &snapshot.owner;

        if owner.kind != S::KIND {
            return Err(LifecycleError::mapping(
                owner.id,
                format!("row is a {}, mapped as {}", owner.kind, S::KIND),
            ));
        }

        if S::INITIAL_RECORD_REQUIRED && snapshot.history.is_empty() {
            return Err(LifecycleError::mapping(
                owner.id,
                format!(
                    "{} owners are created with their first status record, but the history is empty",
                    S::KIND
                ),
            ));
        }

        if let Some(first) = snapshot.history.first() {
            if first.owner_id != owner.id {
                return Err(LifecycleError::mapping(
                    owner.id,
                    format!("history contains a record owned by {}", first.owner_id),
                ));
            }
        }

        let integrity = match snapshot.check_pointer() {
            PointerCheck::Consistent => Integrity::Consistent,
            PointerCheck::Diverged => {
                tracing::warn!(
                    owner = %owner.id,
                    kind = %owner.kind,
                    pointer = ?owner.current_status_id,
                    "current-status pointer lags the history; surfacing latest record"
                );
                Integrity::Diverged
            }
            PointerCheck::Missing => {
                return Err(LifecycleError::mapping(
                    owner.id,
                    "history is non-empty but the current-status pointer is null",
                ));
            }
            PointerCheck::Dangling => {
                return Err(LifecycleError::mapping(
                    owner.id,
                    "current-status pointer resolves to no record in the history",
                ));
            }
        };

        // Rehydrate through the append-only history type: it re-verifies
        // time ordering and per-record owner consistency on every read.
        let records: Vec<StatusRecord<S>> =
            snapshot.history.iter().map(|row| Self::record(row)).collect();
        let history = StatusHistory::from_records(records).map_err(|e| match e {
            LifecycleError::Ordering { .. } => {
                tracing::error!(owner = %owner.id, error = %e, "stored history violates time ordering");
                e
            }
            other => LifecycleError::mapping(owner.id, other.to_string()),
        })?;

        let entries: Vec<StatusEntry<S>> = history.iter().map(Self::entry).collect();
        // Latest-by-time is authoritative for the surfaced current
        // status, stale pointer or not.
        let current = entries.last().cloned();

        Ok(Entity {
            id: owner.id,
            parent_id: owner.parent_id,
            metadata: owner.metadata.clone(),
            created_at: owner.created_at,
            current,
            history: entries,
            integrity,
        })
    }

    fn record<S: StatusKind>(row: &StatusRow) -> StatusRecord<S> {
        let status = S::parse(&row.status).unwrap_or_else(|| {
            tracing::warn!(
                owner = %row.owner_id,
                record = %row.id,
                stored = %row.status,
                fallback = %S::fallback().as_str(),
                "unknown stored status; substituting fallback"
            );
            S::fallback()
        });
        StatusRecord::from_parts(row.id, row.owner_id, status, row.context.clone(), row.created_at)
    }

    fn entry<S: StatusKind>(record: &StatusRecord<S>) -> StatusEntry<S> {
        StatusEntry {
            id: record.id(),
            status: record.status(),
            context: record.context().cloned(),
            created_at: record.created_at(),
        }
    }
}
