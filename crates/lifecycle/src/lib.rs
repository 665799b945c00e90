//! Transition orchestration for the lesson-lifecycle engine
//!
//! Home of [`LifecycleService`], the single write path: it validates
//! requested transitions against the per-kind legal tables, persists the
//! resulting records, and keeps every owner's current-status pointer in
//! step with its history.

pub mod service;

pub use service::{DivergencePolicy, LifecycleService};
