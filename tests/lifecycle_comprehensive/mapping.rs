//! Read-path integrity tests
//!
//! Exercises the mapper against fabricated data drift: null and stale
//! pointers, unknown status strings, and the repair/flag policies of the
//! write path. Fabrication goes through the store's out-of-band methods,
//! the same shape a crashed pointer update would leave behind.

use crate::common::init_tracing;
use lessonlog::prelude::*;
use lessonlog_api::EntityMapper;
use lessonlog_core::record::StatusRecord;
use lessonlog_lifecycle::LifecycleService;
use lessonlog_storage::{MemoryStore, StatusRow, StatusStore};
use std::sync::Arc;

fn engine(policy: DivergencePolicy) -> (Arc<MemoryStore>, LifecycleService) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let service = LifecycleService::with_policy(store.clone() as Arc<dyn StatusStore>, policy);
    (store, service)
}

#[test]
fn milestone_with_history_but_null_pointer_fails_mapping() {
    let (store, service) = engine(DivergencePolicy::Repair);
    let id = service.create_bare::<MilestoneStatus>(None, None).unwrap();
    service
        .transition(id, MilestoneStatus::Planned, None)
        .unwrap();

    store.clear_current_unchecked(id).unwrap();

    let snapshot = service.load(id).unwrap();
    let err = EntityMapper::to_domain::<MilestoneStatus>(&snapshot).unwrap_err();
    assert_eq!(err.error_code(), "Mapping");
}

#[test]
fn stale_pointer_is_surfaced_not_fatal() {
    let (store, service) = engine(DivergencePolicy::Repair);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();

    // The partial-write shape: a record landed, the pointer did not move.
    let orphan = StatusRow::from_record(&StatusRecord::new(id, LessonStatus::Quoted, None));
    store.insert_record_unchecked(orphan).unwrap();

    let snapshot = service.load(id).unwrap();
    let lesson = EntityMapper::to_domain::<LessonStatus>(&snapshot).unwrap();

    assert_eq!(lesson.integrity, Integrity::Diverged);
    assert_eq!(
        lesson.status(),
        Some(LessonStatus::Quoted),
        "latest-by-time is authoritative"
    );
    assert_eq!(lesson.history_len(), 2);
}

#[test]
fn repair_policy_heals_on_next_write() {
    let (store, service) = engine(DivergencePolicy::Repair);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();
    let orphan = StatusRow::from_record(&StatusRecord::new(id, LessonStatus::Quoted, None));
    store.insert_record_unchecked(orphan).unwrap();

    // The write validates from QUOTED, proving the pointer was repaired
    // before validation.
    service
        .transition(id, LessonStatus::Confirmed, None)
        .unwrap();

    let snapshot = service.load(id).unwrap();
    assert!(!snapshot.is_diverged());
    let lesson = EntityMapper::to_domain::<LessonStatus>(&snapshot).unwrap();
    assert_eq!(lesson.integrity, Integrity::Consistent);
    assert_eq!(lesson.status(), Some(LessonStatus::Confirmed));
}

#[test]
fn flag_policy_rejects_the_write_and_keeps_the_data() {
    let (store, service) = engine(DivergencePolicy::Flag);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();
    let orphan = StatusRow::from_record(&StatusRecord::new(id, LessonStatus::Quoted, None));
    store.insert_record_unchecked(orphan).unwrap();

    let err = service
        .transition(id, LessonStatus::Confirmed, None)
        .unwrap_err();
    assert_eq!(err.error_code(), "Mapping");

    // Nothing was written or repaired.
    let snapshot = service.load(id).unwrap();
    assert!(snapshot.is_diverged());
    assert_eq!(snapshot.history.len(), 2);
}

#[test]
fn drifted_status_string_reads_with_fallback() {
    let (store, service) = engine(DivergencePolicy::Repair);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();

    // Historical drift: a status string no enumeration member matches.
    let mut legacy = StatusRow::from_record(&StatusRecord::new(id, LessonStatus::Quoted, None));
    legacy.status = "LEGACY_STATE".to_string();
    let legacy_id = legacy.id;
    store.insert_record_unchecked(legacy).unwrap();
    let version = service.load(id).unwrap().owner.version;
    store.repoint_current(id, version, legacy_id).unwrap();

    let snapshot = service.load(id).unwrap();
    let lesson = EntityMapper::to_domain::<LessonStatus>(&snapshot).unwrap();

    // Readable, substituted with the kind's documented fallback.
    assert_eq!(lesson.status(), Some(LessonStatus::Requested));
    assert_eq!(lesson.history[1].status, LessonStatus::Requested);
    assert_eq!(lesson.integrity, Integrity::Consistent);
}

#[test]
fn write_path_never_uses_the_fallback() {
    let (store, service) = engine(DivergencePolicy::Repair);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();

    let mut legacy = StatusRow::from_record(&StatusRecord::new(id, LessonStatus::Quoted, None));
    legacy.status = "LEGACY_STATE".to_string();
    let legacy_id = legacy.id;
    store.insert_record_unchecked(legacy).unwrap();
    let version = service.load(id).unwrap().owner.version;
    store.repoint_current(id, version, legacy_id).unwrap();

    // The read path degrades gracefully; the write path refuses.
    let err = service
        .transition(id, LessonStatus::Confirmed, None)
        .unwrap_err();
    assert_eq!(err.error_code(), "Validation");
}

#[test]
fn facade_surfaces_divergence_flag_end_to_end() {
    init_tracing();
    // Everything through the public facade: a consistent entity reads as
    // Consistent; the facade's reads never fabricate divergence.
    let db = LessonLog::open();
    let id = db.lessons.create(None, None).unwrap();
    db.lessons.quote(&id, None).unwrap();

    let lesson = db.lessons.get(&id).unwrap().unwrap();
    assert_eq!(lesson.integrity, Integrity::Consistent);
}
