//! Table-driven transition validation
//!
//! One static table per entity kind (carried by the [`StatusKind`]
//! descriptor) maps (current, requested) pairs to allowed/disallowed.
//! Centralizing the tables keeps the full legal-transition graph
//! auditable and testable as data, and guarantees all four entity kinds
//! enforce the same discipline even though their enumerations differ.
//!
//! Every caller that appends a status record goes through
//! [`TransitionValidator::validate_or_fail`]; no transition bypasses it.

use crate::error::{LifecycleError, Result};
use crate::status::StatusKind;

/// Validates requested transitions against the per-kind legal tables.
///
/// Stateless; all table data lives on the status enumerations.
pub struct TransitionValidator;

impl TransitionValidator {
    /// Whether `requested` is legal from `current`.
    ///
    /// `current = None` means the entity has an empty history; the
    /// request is then checked against the kind's valid first statuses.
    /// A request for the status already held is disallowed unless the
    /// table lists the self-loop explicitly.
    pub fn can_transition<S: StatusKind>(current: Option<S>, requested: S) -> bool {
        match current {
            None => S::INITIAL.contains(&requested),
            Some(from) => from.transitions().contains(&requested),
        }
    }

    /// Validate or fail with `InvalidTransition` naming the pair.
    pub fn validate_or_fail<S: StatusKind>(current: Option<S>, requested: S) -> Result<()> {
        if Self::can_transition(current, requested) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                kind: S::KIND,
                from: current.map(|s| s.as_str()),
                to: requested.as_str(),
            })
        }
    }

    /// The full legal-transition graph for a kind, as data.
    ///
    /// Every `(from, to)` pair the table allows, in table order. Used by
    /// audits and table-driven tests; pairs absent from this list are
    /// exactly the ones `validate_or_fail` rejects.
    pub fn transition_graph<S: StatusKind>() -> Vec<(S, S)> {
        S::ALL
            .iter()
            .flat_map(|&from| from.transitions().iter().map(move |&to| (from, to)))
            .collect()
    }

    /// Valid first statuses for a kind (empty history)
    pub fn initial_statuses<S: StatusKind>() -> &'static [S] {
        S::INITIAL
    }
}
