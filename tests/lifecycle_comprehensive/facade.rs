//! Facade-level tests
//!
//! The per-kind handles, listing and filtering, parent links and
//! metadata, and the wire encoding handed to an external API layer.

use crate::common::TestDb;
use lessonlog::prelude::*;
use lessonlog::WireError;
use lessonlog_lifecycle::LifecycleService;
use lessonlog_storage::{MemoryStore, StatusStore};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn parent_links_and_metadata_survive_the_round_trip() {
    let t = TestDb::new();

    let quote = Uuid::new_v4();
    let lesson = t
        .db
        .lessons
        .create(Some(quote), Some(json!({"subject": "algebra"})))
        .unwrap();

    let entity = t.db.lessons.get(&lesson).unwrap().unwrap();
    assert_eq!(entity.quote_id(), Some(quote));
    assert_eq!(entity.metadata, Some(json!({"subject": "algebra"})));

    let plan = t.db.plans.create(Some(Uuid::new_v4()), None).unwrap();
    assert!(t.db.plans.get(&plan).unwrap().unwrap().lesson_id().is_some());

    let milestone = t.db.milestones.create(Some(Uuid::new_v4()), None).unwrap();
    assert!(t
        .db
        .milestones
        .get(&milestone)
        .unwrap()
        .unwrap()
        .plan_id()
        .is_some());

    let goal = t.db.goals.create(Some(Uuid::new_v4()), None).unwrap();
    assert!(t.db.goals.get(&goal).unwrap().unwrap().lesson_id().is_some());
}

#[test]
fn kinds_are_isolated_in_listings() {
    let t = TestDb::new();
    t.db.lessons.create(None, None).unwrap();
    t.db.lessons.create(None, None).unwrap();
    t.db.plans.create(None, None).unwrap();
    let goal = t.db.goals.create(None, None).unwrap();
    t.db.goals.propose(&goal).unwrap();

    assert_eq!(t.db.lessons.list(None, None).unwrap().len(), 2);
    assert_eq!(t.db.plans.list(None, None).unwrap().len(), 1);
    assert_eq!(t.db.goals.list(None, None).unwrap().len(), 1);
    assert_eq!(t.db.milestones.list(None, None).unwrap().len(), 0);
}

#[test]
fn listing_filters_by_current_status_and_caps_results() {
    let t = TestDb::new();
    let confirmed = t.lesson_at(LessonStatus::Confirmed);
    t.lesson_at(LessonStatus::Requested);
    t.lesson_at(LessonStatus::Cancelled);

    let hits = t.db.lessons.list(Some(LessonStatus::Confirmed), None).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, confirmed);

    assert_eq!(t.db.lessons.list(None, Some(2)).unwrap().len(), 2);
    assert!(t
        .db
        .lessons
        .list(Some(LessonStatus::Completed), None)
        .unwrap()
        .is_empty());
}

#[test]
fn get_unknown_owner_is_none_but_history_is_not_found() {
    let t = TestDb::new();
    let ghost = OwnerId::new();
    assert!(t.db.lessons.get(&ghost).unwrap().is_none());
    assert!(!t.db.lessons.exists(&ghost).unwrap());

    let err = t.db.lessons.history(&ghost).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.code(), "NotFound");
}

#[test]
fn facade_errors_carry_stable_codes() {
    let t = TestDb::new();
    let id = t.lesson_at(LessonStatus::Confirmed);

    let err = t.db.lessons.confirm(&id).unwrap_err();
    assert_eq!(err.code(), "InvalidTransition");
    assert!(!err.is_retryable());

    let err = t.db.transition(EntityKind::Lesson, id, "NONSENSE", None).unwrap_err();
    assert_eq!(err.code(), "Validation");
}

#[test]
fn wire_encoding_of_a_real_rejection() {
    let store = Arc::new(MemoryStore::new());
    let service = LifecycleService::new(store as Arc<dyn StatusStore>);
    let id = service
        .create_with_initial(None, None, LessonStatus::Requested, None)
        .unwrap();
    service.transition(id, LessonStatus::Cancelled, None).unwrap();

    let err = service
        .transition(id, LessonStatus::Confirmed, None)
        .unwrap_err();
    let wire = WireError::from(&err);

    assert_eq!(wire.code, "InvalidTransition");
    let details = wire.details.unwrap();
    assert_eq!(details["kind"], "Lesson");
    assert_eq!(details["from"], "CANCELLED");
    assert_eq!(details["to"], "CONFIRMED");

    let encoded = serde_json::to_value(WireError::from(&err)).unwrap();
    assert_eq!(encoded["code"], "InvalidTransition");
}

#[test]
fn builder_is_reusable_across_configurations() {
    let repair = LessonLog::builder().build();
    let flag = LessonLog::builder()
        .divergence_policy(DivergencePolicy::Flag)
        .build();

    // Both engines work independently.
    let a = repair.lessons.create(None, None).unwrap();
    let b = flag.lessons.create(None, None).unwrap();
    repair.lessons.confirm(&a).unwrap();
    flag.lessons.confirm(&b).unwrap();

    assert!(repair.lessons.get(&b).unwrap().is_none(), "stores are separate");
}
