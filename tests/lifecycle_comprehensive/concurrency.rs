//! Concurrency tests
//!
//! Same-owner transitions linearize; a race against one baseline has
//! exactly one winner; cross-owner transitions are fully independent.

use crate::common::{init_tracing, TestDb};
use lessonlog::prelude::*;
use lessonlog_lifecycle::LifecycleService;
use lessonlog_storage::{MemoryStore, StatusStore};
use std::sync::{Arc, Barrier};

#[test]
fn two_writers_one_baseline_exactly_one_wins() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(LifecycleService::new(store.clone() as Arc<dyn StatusStore>));
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();

    // Both threads validate against the same loaded baseline.
    let baseline = Arc::new(service.load(id).unwrap());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = [LessonStatus::Quoted, LessonStatus::Cancelled]
        .into_iter()
        .map(|status| {
            let service = Arc::clone(&service);
            let baseline = Arc::clone(&baseline);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                service.transition_with_baseline(&baseline, status, None)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let lost_races = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_retryable()))
        .count();
    assert_eq!((wins, lost_races), (1, 1), "exactly one success, one lost race");

    let snapshot = service.load(id).unwrap();
    assert_eq!(
        snapshot.history.len(),
        2,
        "exactly one record appended to the original history"
    );
    assert!(!snapshot.is_diverged());
}

#[test]
fn loser_retries_with_fresh_baseline_and_succeeds() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let service = LifecycleService::new(store as Arc<dyn StatusStore>);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();

    let stale = service.load(id).unwrap();
    service
        .transition_with_baseline(&stale, LessonStatus::Quoted, None)
        .unwrap();

    // The core never retries; the caller does, with fresh state.
    let err = service
        .transition_with_baseline(&stale, LessonStatus::Confirmed, None)
        .unwrap_err();
    assert!(err.is_retryable());

    let fresh = service.load(id).unwrap();
    service
        .transition_with_baseline(&fresh, LessonStatus::Confirmed, None)
        .unwrap();
    assert_eq!(
        service.load(id).unwrap().current.unwrap().status,
        "CONFIRMED"
    );
}

#[test]
fn same_owner_writers_linearize_under_the_facade() {
    let t = TestDb::new();
    let id = t.agreed_goal();
    let db = Arc::new(t.db);

    // AGREED -> AGREED is legal, so every serialized writer succeeds.
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                db.goals
                    .agree(&id, Some(serde_json::json!({ "round": i })))
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    let goal = db.goals.get(&id).unwrap().unwrap();
    // propose + agree + 8 re-agreements
    assert_eq!(goal.history_len(), 10);
    assert_eq!(goal.integrity, Integrity::Consistent);
}

#[test]
fn cross_owner_transitions_proceed_in_parallel() {
    let t = TestDb::new();
    let db = Arc::new(t.db);

    let ids: Vec<OwnerId> = (0..16)
        .map(|_| db.lessons.create(None, None).unwrap())
        .collect();

    let barrier = Arc::new(Barrier::new(ids.len()));
    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                db.lessons.confirm(&id)?;
                db.lessons.start(&id)?;
                db.lessons.complete(&id)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    for id in ids {
        let lesson = db.lessons.get(&id).unwrap().unwrap();
        assert_eq!(lesson.status(), Some(LessonStatus::Completed));
        assert_eq!(lesson.history_len(), 4);
        assert_eq!(lesson.integrity, Integrity::Consistent);
    }
}
