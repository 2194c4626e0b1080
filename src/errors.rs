//! Model validation errors with clear diagnostic messages
use crate::registration::SupplementaryKind;
use crate::types::Id;
use thiserror::Error;

/// Errors detected while constructing a view model.
///
/// These surface caller bugs at construction time, before a snapshot of the
/// broken tree can reach the differ. Everything downstream of a validated
/// model is infallible; out-of-range index access into a validated model is
/// treated as a programmer error and panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate section identifier '{id}'")]
    DuplicateSection { id: Id },

    #[error("duplicate cell identifier '{id}' in section '{section}'")]
    DuplicateCell { section: Id, id: Id },

    #[error("duplicate supplementary view identifier '{id}' in section '{section}'")]
    DuplicateSupplementary { section: Id, id: Id },

    #[error(
        "supplementary view '{id}' in section '{section}' has kind {found:?}, expected {expected:?}"
    )]
    SupplementaryKindMismatch {
        section: Id,
        id: Id,
        expected: SupplementaryKind,
        found: SupplementaryKind,
    },
}
