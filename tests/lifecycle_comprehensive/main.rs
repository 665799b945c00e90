//! Comprehensive lifecycle tests
//!
//! End-to-end coverage of the status-tracking engine:
//! - `transitions`: legality of every pair, per kind, driven through the
//!   public API
//! - `history`: append-only ordering, pointer consistency, round-trips
//! - `concurrency`: same-owner races and cross-owner independence
//! - `mapping`: read-path integrity enforcement and graceful drift
//!   handling
//! - `facade`: handles, listing, configuration, wire encoding

mod common;

mod concurrency;
mod facade;
mod mapping;
mod transitions;
