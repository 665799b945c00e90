//! Transition legality tests
//!
//! Exercises the legal-transition tables through the public API:
//! - the two canonical scenarios (REQUESTED -> CONFIRMED succeeds,
//!   COMPLETED -> REQUESTED fails)
//! - an exhaustive pair sweep for Lesson driven against the audit graph
//! - happy paths and self-loop policy for every kind

use crate::common::TestDb;
use lessonlog::prelude::*;
use lessonlog::TransitionValidator;
use serde_json::json;

// =============================================================================
// Canonical scenarios
// =============================================================================

#[test]
fn requested_to_confirmed_succeeds() {
    let t = TestDb::new();
    let id = t.db.lessons.create(None, None).unwrap();

    let before = t.db.lessons.get(&id).unwrap().unwrap();
    assert_eq!(before.status(), Some(LessonStatus::Requested));

    t.db.lessons.confirm(&id).unwrap();

    let after = t.db.lessons.get(&id).unwrap().unwrap();
    assert_eq!(after.status(), Some(LessonStatus::Confirmed));
    assert_eq!(after.history_len(), before.history_len() + 1);
}

#[test]
fn completed_to_requested_fails_and_names_the_pair() {
    let t = TestDb::new();
    let id = t.lesson_at(LessonStatus::Completed);
    let before = t.db.lessons.get(&id).unwrap().unwrap();

    let err = t
        .db
        .lessons
        .transition(&id, LessonStatus::Requested, None)
        .unwrap_err();
    match err {
        Error::InvalidTransition { kind, from, to } => {
            assert_eq!(kind, EntityKind::Lesson);
            assert_eq!(from, Some("COMPLETED"));
            assert_eq!(to, "REQUESTED");
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }

    let after = t.db.lessons.get(&id).unwrap().unwrap();
    assert_eq!(after.history_len(), before.history_len(), "history unchanged");
    assert_eq!(after.status(), Some(LessonStatus::Completed));
}

// =============================================================================
// Exhaustive pair sweep (Lesson)
// =============================================================================

#[test]
fn every_lesson_pair_matches_the_audit_graph() {
    let t = TestDb::new();
    let graph = TransitionValidator::transition_graph::<LessonStatus>();

    for &from in LessonStatus::ALL {
        for &to in LessonStatus::ALL {
            let id = t.lesson_at(from);
            let before = t.db.lessons.get(&id).unwrap().unwrap();
            let result = t.db.lessons.transition(&id, to, None);
            let after = t.db.lessons.get(&id).unwrap().unwrap();

            if graph.contains(&(from, to)) {
                assert!(result.is_ok(), "{} -> {} should succeed", from, to);
                assert_eq!(after.status(), Some(to));
                assert_eq!(after.history_len(), before.history_len() + 1);
            } else {
                assert!(
                    result.unwrap_err().is_invalid_transition(),
                    "{} -> {} should be rejected",
                    from,
                    to
                );
                assert_eq!(after, before, "rejection must persist nothing");
            }
        }
    }
}

// =============================================================================
// Happy paths per kind
// =============================================================================

#[test]
fn plan_full_arc() {
    let t = TestDb::new();
    let id = t.db.plans.create(None, None).unwrap();

    t.db.plans.activate(&id).unwrap();
    t.db.plans.pause(&id).unwrap();
    t.db.plans.resume(&id).unwrap();
    t.db.plans.complete(&id).unwrap();

    let plan = t.db.plans.get(&id).unwrap().unwrap();
    assert_eq!(plan.status(), Some(PlanStatus::Completed));
    assert_eq!(
        plan.history.iter().map(|e| e.status).collect::<Vec<_>>(),
        vec![
            PlanStatus::Draft,
            PlanStatus::Active,
            PlanStatus::Paused,
            PlanStatus::Active,
            PlanStatus::Completed,
        ]
    );
}

#[test]
fn milestone_starts_bare_and_moves_through_its_graph() {
    let t = TestDb::new();
    let id = t.db.milestones.create(None, None).unwrap();

    let bare = t.db.milestones.get(&id).unwrap().unwrap();
    assert_eq!(bare.status(), None, "no status before scheduling");

    // ACHIEVED is not a valid first status.
    let err = t.db.milestones.achieve(&id).unwrap_err();
    assert!(err.is_invalid_transition());

    t.db.milestones.schedule(&id).unwrap();
    t.db.milestones.start(&id).unwrap();
    t.db.milestones.achieve(&id).unwrap();

    let done = t.db.milestones.get(&id).unwrap().unwrap();
    assert_eq!(done.status(), Some(MilestoneStatus::Achieved));
    assert_eq!(done.history_len(), 3);
}

#[test]
fn goal_full_arc_with_reagreement() {
    let t = TestDb::new();
    let id = t.db.goals.create(None, None).unwrap();

    t.db.goals.propose(&id).unwrap();
    t.db.goals.agree(&id, Some(json!({"target": "pass exam"}))).unwrap();
    // Re-agreeing is the one whitelisted same-status transition.
    t.db.goals
        .agree(&id, Some(json!({"target": "pass exam with distinction"})))
        .unwrap();
    t.db.goals.achieve(&id).unwrap();

    let goal = t.db.goals.get(&id).unwrap().unwrap();
    assert_eq!(goal.status(), Some(GoalStatus::Achieved));
    assert_eq!(goal.history_len(), 4);
}

// =============================================================================
// Self-loop policy
// =============================================================================

#[test]
fn repeating_the_current_status_is_rejected_by_default() {
    let t = TestDb::new();

    let lesson = t.lesson_at(LessonStatus::Confirmed);
    assert!(t
        .db
        .lessons
        .transition(&lesson, LessonStatus::Confirmed, None)
        .unwrap_err()
        .is_invalid_transition());

    let plan = t.db.plans.create(None, None).unwrap();
    t.db.plans.activate(&plan).unwrap();
    assert!(t.db.plans.activate(&plan).unwrap_err().is_invalid_transition());
}

#[test]
fn whitelisted_self_loop_appends_a_real_record() {
    let t = TestDb::new();
    let id = t.agreed_goal();

    let before = t.db.goals.get(&id).unwrap().unwrap();
    t.db.goals.agree(&id, Some(json!({"note": "revised"}))).unwrap();
    let after = t.db.goals.get(&id).unwrap().unwrap();

    assert_eq!(after.history_len(), before.history_len() + 1);
    assert_eq!(after.status(), Some(GoalStatus::Agreed));
}

// =============================================================================
// Raw request payload surface
// =============================================================================

#[test]
fn raw_transition_parses_and_applies() {
    let t = TestDb::new();
    let id = t.db.lessons.create(None, None).unwrap();

    t.db.transition(
        EntityKind::Lesson,
        id,
        "CONFIRMED",
        Some(json!({"accepted_by": "student"})),
    )
    .unwrap();

    let lesson = t.db.lessons.get(&id).unwrap().unwrap();
    assert_eq!(lesson.status(), Some(LessonStatus::Confirmed));
    assert_eq!(
        lesson.current.unwrap().context,
        Some(json!({"accepted_by": "student"}))
    );
}

#[test]
fn raw_transition_rejects_unknown_members() {
    let t = TestDb::new();
    let id = t.db.lessons.create(None, None).unwrap();

    let err = t
        .db
        .transition(EntityKind::Lesson, id, "MENTORED", None)
        .unwrap_err();
    assert_eq!(err.code(), "Validation");

    // Another kind's member is just as unknown to this kind's table.
    let err = t
        .db
        .transition(EntityKind::Lesson, id, "AGREED", None)
        .unwrap_err();
    assert_eq!(err.code(), "Validation");
}

#[test]
fn raw_transition_unknown_owner() {
    let t = TestDb::new();
    let err = t
        .db
        .transition(EntityKind::Lesson, OwnerId::new(), "CONFIRMED", None)
        .unwrap_err();
    assert!(err.is_not_found());
}
