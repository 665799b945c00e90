//! Shared test helpers.

use lessonlog::prelude::*;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test subscriber once so warn-path logging is visible with
/// `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// A fresh engine per test.
pub struct TestDb {
    pub db: LessonLog,
}

impl TestDb {
    pub fn new() -> Self {
        init_tracing();
        Self {
            db: LessonLog::open(),
        }
    }

    /// A goal driven to AGREED.
    pub fn agreed_goal(&self) -> OwnerId {
        let id = self.db.goals.create(None, None).unwrap();
        self.db.goals.propose(&id).unwrap();
        self.db.goals.agree(&id, None).unwrap();
        id
    }

    /// Drive a fresh lesson into `target` along the shortest legal path.
    pub fn lesson_at(&self, target: LessonStatus) -> OwnerId {
        let id = self.db.lessons.create(None, None).unwrap();
        match target {
            LessonStatus::Requested => {}
            LessonStatus::Quoted => {
                self.db.lessons.quote(&id, None).unwrap();
            }
            LessonStatus::Confirmed => {
                self.db.lessons.confirm(&id).unwrap();
            }
            LessonStatus::InProgress => {
                self.db.lessons.confirm(&id).unwrap();
                self.db.lessons.start(&id).unwrap();
            }
            LessonStatus::Completed => {
                self.db.lessons.confirm(&id).unwrap();
                self.db.lessons.start(&id).unwrap();
                self.db.lessons.complete(&id).unwrap();
            }
            LessonStatus::Cancelled => {
                self.db.lessons.cancel(&id, None).unwrap();
            }
            LessonStatus::Expired => {
                self.db.lessons.expire(&id).unwrap();
            }
        }
        id
    }
}
